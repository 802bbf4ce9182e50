//! Error types for mxrus.

use thiserror::Error;

use crate::archive::ExtractError;
use crate::package::PackageRole;

/// mxrus error type.
#[derive(Error, Debug)]
pub enum Error {
    /// The archive could not be extracted. Returned unchanged from the extractor.
    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// IO error outside of extraction (e.g. creating the extraction root)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A single package failed to load
    #[error("Failed to load {role} package: {reason}")]
    PackageLoad { role: PackageRole, reason: String },

    /// The auxiliary package could not be located in the extracted bundle
    #[error("Discovery error: {0}")]
    Discovery(String),

    /// A package load did not finish before the configured deadline
    #[error("Timed out loading {0} package")]
    Timeout(PackageRole),

    /// Invalid loader configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type alias for mxrus operations.
pub type Result<T> = std::result::Result<T, Error>;
