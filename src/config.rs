//! Loader configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::defaults::{self, APP_DIR_NAME, EXTRACT_ROOT_ENV};
use crate::error::{Error, Result};

/// Settings for a [`BundleLoader`](crate::BundleLoader).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Directory under which scratch extraction directories are created.
    #[serde(default = "default_extract_root")]
    pub extract_root: PathBuf,
    /// Deadline for each individual package load. `None` waits indefinitely.
    #[serde(default)]
    pub package_timeout: Option<Duration>,
    /// Passed to [`PackageHandle::release`](crate::PackageHandle::release).
    #[serde(default = "defaults::release_dependents")]
    pub release_dependents: bool,
}

impl LoaderConfig {
    pub fn new() -> Self {
        Self {
            extract_root: default_extract_root(),
            package_timeout: None,
            release_dependents: defaults::release_dependents(),
        }
    }

    /// Override the extraction root. Empty paths are rejected.
    pub fn with_extract_root(mut self, root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if root.as_os_str().is_empty() {
            return Err(Error::Config("extraction root cannot be empty".into()));
        }
        self.extract_root = root;
        Ok(self)
    }

    pub fn with_package_timeout(mut self, timeout: Duration) -> Self {
        self.package_timeout = Some(timeout);
        self
    }

    pub fn with_release_dependents(mut self, release_dependents: bool) -> Self {
        self.release_dependents = release_dependents;
        self
    }

    pub fn extract_root(&self) -> &Path {
        &self.extract_root
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve the default extraction root.
///
/// Order of precedence:
/// 1. `MXRUS_EXTRACT_ROOT` if set and non-empty
/// 2. `<local data dir>/mxrus`
/// 3. `<temp dir>/mxrus`
pub fn default_extract_root() -> PathBuf {
    resolve_extract_root(std::env::var(EXTRACT_ROOT_ENV).ok())
}

fn resolve_extract_root(env_override: Option<String>) -> PathBuf {
    if let Some(root) = env_override.filter(|s| !s.trim().is_empty()) {
        return PathBuf::from(root);
    }

    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
}
