//! Packages held inside a bundle and the host capabilities that load them.
//!
//! The package binary format belongs to the host engine. mxrus only asks a
//! [`PackageLoader`] to turn a file into a [`PackageHandle`] and later hands
//! the handle back through [`PackageHandle::release`].

pub mod discovery;

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use discovery::{discover_auxiliary, plan_packages};

/// Logical purpose of a package within a bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageRole {
    /// Generic assets package
    Assets,
    /// Scene package
    Scene,
    /// Engine-generated package found by its reserved extension
    Auxiliary,
}

impl PackageRole {
    pub const ALL: [PackageRole; 3] = [Self::Assets, Self::Scene, Self::Auxiliary];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Assets => "assets",
            Self::Scene => "scene",
            Self::Auxiliary => "auxiliary",
        }
    }
}

impl fmt::Display for PackageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A package loaded by the host engine.
pub trait PackageHandle: Send + Sync {
    /// Paths of the scenes embedded in this package.
    fn scene_paths(&self) -> Vec<String>;

    /// Give the package back to the host.
    ///
    /// `release_dependents` also unloads objects created from the package's
    /// contents. Failures are the host's concern and are not reported.
    fn release(self: Box<Self>, release_dependents: bool);
}

/// Host primitive that loads a single package file.
#[async_trait]
pub trait PackageLoader: Send + Sync {
    /// Load the package at `path`. Fails if the file is missing or is not a
    /// valid package for the host.
    async fn load(&self, path: &Path) -> io::Result<Box<dyn PackageHandle>>;
}

/// Loaded packages keyed by role.
#[derive(Default)]
pub struct PackageTable {
    handles: HashMap<PackageRole, Box<dyn PackageHandle>>,
}

impl PackageTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, role: PackageRole, handle: Box<dyn PackageHandle>) {
        if let Some(previous) = self.handles.insert(role, handle) {
            log::warn!("Replacing already loaded {} package", role);
            previous.release(true);
        }
    }

    pub fn get(&self, role: PackageRole) -> Option<&dyn PackageHandle> {
        self.handles.get(&role).map(|h| h.as_ref())
    }

    pub fn contains(&self, role: PackageRole) -> bool {
        self.handles.contains_key(&role)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn roles(&self) -> Vec<PackageRole> {
        let mut roles: Vec<_> = self.handles.keys().copied().collect();
        roles.sort();
        roles
    }

    /// Release every handle and leave the table empty. Returns how many were released.
    pub fn release_all(&mut self, release_dependents: bool) -> usize {
        let count = self.handles.len();
        for (role, handle) in self.handles.drain() {
            log::debug!("Releasing {} package", role);
            handle.release(release_dependents);
        }
        count
    }
}

impl fmt::Debug for PackageTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PackageTable")
            .field("roles", &self.roles())
            .finish()
    }
}
