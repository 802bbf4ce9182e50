//! Fixed names and markers of the .mxrus container layout.

/// File name of the generic assets package inside an extracted bundle.
pub const ASSETS_PACKAGE_NAME: &str = "assets";
/// File name of the scene package inside an extracted bundle.
pub const SCENE_PACKAGE_NAME: &str = "scene";
/// Extension (without the dot) marking the engine-generated auxiliary package.
pub const AUXILIARY_PACKAGE_EXT: &str = "unitygenerated";
/// Appended to the source file stem to name the scratch directory.
pub const EXTRACT_DIR_SUFFIX: &str = "-extract";

/// Directory created under the platform data dir when no root is configured.
pub const APP_DIR_NAME: &str = "mxrus";
/// Environment variable overriding the default extraction root.
pub const EXTRACT_ROOT_ENV: &str = "MXRUS_EXTRACT_ROOT";

pub fn release_dependents() -> bool { true }
