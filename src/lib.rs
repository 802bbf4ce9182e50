//! mxrus - loader for `.mxrus` environment bundles.
//!
//! A bundle is an archive holding an assets package, a scene package and one
//! engine-generated package. [`BundleLoader`] extracts it to a scratch
//! directory, loads every package through the host's [`PackageLoader`], and
//! removes the scratch directory before reporting the result.

mod defaults;
pub mod error;

pub mod archive;
pub mod config;
pub mod loader;
pub mod package;
pub mod validation;

pub use error::{Error, Result};

pub use archive::{scratch_dir_for, ArchiveExtractor, ExtractError, TarGzExtractor};
pub use config::{default_extract_root, LoaderConfig};
pub use defaults::{
    ASSETS_PACKAGE_NAME, AUXILIARY_PACKAGE_EXT, EXTRACT_DIR_SUFFIX, EXTRACT_ROOT_ENV,
    SCENE_PACKAGE_NAME,
};
pub use loader::{BundleLoader, LoadOutcome, LoaderState};
pub use package::{PackageHandle, PackageLoader, PackageRole, PackageTable};
pub use validation::{Violation, ViolationKind};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
