//! Bundle loading.
//!
//! This module provides:
//! - The loader state machine (`state`)
//! - The load/unload orchestrator (`bundle`)

pub mod bundle;
pub mod state;

pub use bundle::{BundleLoader, LoadOutcome};
pub use state::LoaderState;
