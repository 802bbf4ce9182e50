//! Bundle loader state machine.
//!
//! IDLE -> LOADING -> SUCCESS | ERROR, and back to IDLE on unload.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a [`BundleLoader`](super::BundleLoader).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoaderState {
    /// Nothing loaded; initial state and the state after unload
    #[default]
    Idle,
    /// A load is in progress
    Loading,
    /// The last load failed; no packages are held
    Error,
    /// Every package of the last bundle is loaded
    Success,
}

impl LoaderState {
    /// Whether the loader is at rest (not mid-load).
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Loading)
    }
}

impl std::fmt::Display for LoaderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "IDLE"),
            Self::Loading => write!(f, "LOADING"),
            Self::Error => write!(f, "ERROR"),
            Self::Success => write!(f, "SUCCESS"),
        }
    }
}
