//! Load orchestration for `.mxrus` bundles.
//!
//! Provides the `BundleLoader` struct which manages:
//! - Extraction of the bundle into a scratch directory
//! - Concurrent loading of the assets, scene and auxiliary packages
//! - Commit or rollback of the loaded packages
//! - Removal of the scratch directory on every exit path

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::watch;

use crate::archive::{scratch_dir_for, ArchiveExtractor, ExtractError, TarGzExtractor};
use crate::config::LoaderConfig;
use crate::error::{Error, Result};
use crate::loader::state::LoaderState;
use crate::package::{plan_packages, PackageHandle, PackageLoader, PackageRole, PackageTable};

/// Result of a load that got past extraction.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    /// Roles that failed, with the error, in role order
    pub failures: Vec<(PackageRole, Error)>,
}

impl LoadOutcome {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failed_roles(&self) -> Vec<PackageRole> {
        self.failures.iter().map(|(role, _)| *role).collect()
    }
}

/// Loads `.mxrus` bundles and owns the resulting packages.
///
/// Each call to [`load`](Self::load) starts from scratch: packages from a
/// previous load are released first. Packages stay loaded until
/// [`unload`](Self::unload), the next load, or drop.
pub struct BundleLoader {
    config: LoaderConfig,
    extractor: Arc<dyn ArchiveExtractor>,
    packages: Arc<dyn PackageLoader>,
    table: PackageTable,
    auxiliary_name: Option<String>,
    state: watch::Sender<LoaderState>,
}

impl BundleLoader {
    /// Create a loader with the default configuration and tar.gz extraction.
    pub fn new(packages: Arc<dyn PackageLoader>) -> Self {
        Self::with_options(LoaderConfig::default(), Arc::new(TarGzExtractor::new()), packages)
    }

    /// Create with custom options.
    pub fn with_options(
        config: LoaderConfig,
        extractor: Arc<dyn ArchiveExtractor>,
        packages: Arc<dyn PackageLoader>,
    ) -> Self {
        let (state, _) = watch::channel(LoaderState::Idle);
        Self {
            config,
            extractor,
            packages,
            table: PackageTable::new(),
            auxiliary_name: None,
            state,
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn state(&self) -> LoaderState {
        *self.state.borrow()
    }

    /// Watch state transitions. `Loading` is published before any package
    /// I/O starts; `Success`/`Error` only once the scratch directory is gone.
    pub fn subscribe(&self) -> watch::Receiver<LoaderState> {
        self.state.subscribe()
    }

    pub fn packages(&self) -> &PackageTable {
        &self.table
    }

    /// Load the bundle at `source`.
    ///
    /// Returns `Ok(true)` when all three packages loaded and `Ok(false)` when
    /// any of them failed (details go to the log). `Err` means the bundle
    /// could not be extracted at all; the extractor's error is returned as is.
    pub async fn load(&mut self, source: &Path, extract_location: Option<&Path>) -> Result<bool> {
        let outcome = self.load_with_outcome(source, extract_location).await?;
        Ok(outcome.is_success())
    }

    /// Same as [`load`](Self::load) but reports which roles failed.
    pub async fn load_with_outcome(
        &mut self,
        source: &Path,
        extract_location: Option<&Path>,
    ) -> Result<LoadOutcome> {
        let extract_root = match extract_location {
            Some(location) if !location.as_os_str().is_empty() => location.to_path_buf(),
            _ => self.config.extract_root.clone(),
        };
        tokio::fs::create_dir_all(&extract_root).await?;

        self.release_packages();
        self.set_state(LoaderState::Loading);

        log::info!("Loading {}", source.display());

        let scratch_dir = scratch_dir_for(&extract_root, source);

        // Leftovers from an interrupted load must not mix with this bundle
        if let Err(e) = clear_stale_scratch_dir(&scratch_dir).await {
            log::error!(
                "Failed to clear stale scratch directory {}: {}",
                scratch_dir.display(),
                e
            );
            self.set_state(LoaderState::Error);
            return Err(e.into());
        }

        log::info!("Extracting {} to {}", source.display(), scratch_dir.display());
        if let Err(e) = extract_blocking(&self.extractor, source, &scratch_dir).await {
            log::error!("Failed to extract {}: {}", source.display(), e);
            remove_scratch_dir(&scratch_dir).await;
            self.set_state(LoaderState::Error);
            return Err(e.into());
        }

        let plan = plan_packages(&scratch_dir);
        log::info!(
            "Attempting to load the following packages: {}",
            plan.iter()
                .map(|(role, path)| match path {
                    Ok(path) => format!("{} ({})", role, file_name(path)),
                    Err(_) => role.to_string(),
                })
                .collect::<Vec<_>>()
                .join(", ")
        );

        let packages = Arc::clone(&self.packages);
        let timeout = self.config.package_timeout;
        let results = join_all(plan.into_iter().map(|(role, path)| {
            let packages = &*packages;
            async move { (role, load_package(packages, role, path, timeout).await) }
        }))
        .await;

        let mut outcome = LoadOutcome::default();
        for (role, result) in results {
            match result {
                Ok((path, handle)) => {
                    if role == PackageRole::Auxiliary {
                        self.auxiliary_name = Some(file_name(&path));
                    }
                    self.table.insert(role, handle);
                    log::info!("Loaded {} package from {}", role, path.display());
                }
                Err(e) => {
                    log::error!("Failed to load {} package: {}", role, e);
                    outcome.failures.push((role, e));
                }
            }
        }

        // Always remove the scratch directory, whatever happened above
        remove_scratch_dir(&scratch_dir).await;

        if outcome.is_success() {
            log::info!("Loaded {}", source.display());
            self.set_state(LoaderState::Success);
        } else {
            self.release_packages();
            log::error!(
                "Failed to load the following packages: {}",
                outcome
                    .failed_roles()
                    .iter()
                    .map(|r| r.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            self.set_state(LoaderState::Error);
        }

        Ok(outcome)
    }

    /// Release all loaded packages and return to `Idle`.
    pub fn unload(&mut self) {
        self.release_packages();
        self.set_state(LoaderState::Idle);
    }

    /// Name of the primary scene: the file stem of the scene package's
    /// first embedded scene path.
    pub fn scene_name(&self) -> Option<String> {
        let Some(scene) = self.loaded(PackageRole::Scene) else {
            log::error!("scene package not loaded");
            return None;
        };

        let scene_paths = scene.scene_paths();
        let first = match scene_paths.as_slice() {
            [] => {
                log::error!("There are no scenes in the scene package");
                return None;
            }
            [only] => only,
            [first, ..] => {
                log::warn!(
                    "There are multiple scenes in the scene package. \
                     Only the name of the scene at index 0 will be returned."
                );
                first
            }
        };

        if first.is_empty() {
            return None;
        }
        Path::new(first)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
    }

    /// The assets package, if the last load succeeded.
    pub fn assets(&self) -> Option<&dyn PackageHandle> {
        let assets = self.loaded(PackageRole::Assets);
        if assets.is_none() {
            log::error!("assets package not loaded");
        }
        assets
    }

    /// Any loaded package by role.
    pub fn package(&self, role: PackageRole) -> Option<&dyn PackageHandle> {
        self.loaded(role)
    }

    /// File name of the engine-generated package picked up by the last successful load.
    pub fn auxiliary_name(&self) -> Option<&str> {
        self.auxiliary_name.as_deref()
    }

    fn loaded(&self, role: PackageRole) -> Option<&dyn PackageHandle> {
        if self.state() != LoaderState::Success {
            return None;
        }
        self.table.get(role)
    }

    fn release_packages(&mut self) {
        let released = self.table.release_all(self.config.release_dependents);
        if released > 0 {
            log::debug!("Released {} packages", released);
        }
        self.auxiliary_name = None;
    }

    fn set_state(&self, state: LoaderState) {
        let previous = self.state.send_replace(state);
        if previous != state {
            log::debug!("Loader state {} -> {}", previous, state);
        }
    }
}

impl Drop for BundleLoader {
    fn drop(&mut self) {
        self.release_packages();
    }
}

async fn load_package(
    packages: &dyn PackageLoader,
    role: PackageRole,
    path: Result<PathBuf>,
    timeout: Option<Duration>,
) -> Result<(PathBuf, Box<dyn PackageHandle>)> {
    let path = path?;

    let loaded = match timeout {
        Some(deadline) => tokio::time::timeout(deadline, packages.load(&path))
            .await
            .map_err(|_| Error::Timeout(role))?,
        None => packages.load(&path).await,
    };

    let handle = loaded.map_err(|e| Error::PackageLoad {
        role,
        reason: e.to_string(),
    })?;
    Ok((path, handle))
}

/// Run the extractor on the blocking pool.
async fn extract_blocking(
    extractor: &Arc<dyn ArchiveExtractor>,
    source: &Path,
    destination: &Path,
) -> std::result::Result<(), ExtractError> {
    let extractor = Arc::clone(extractor);
    let source = source.to_path_buf();
    let destination = destination.to_path_buf();
    tokio::task::spawn_blocking(move || extractor.extract(&source, &destination))
        .await
        .map_err(|e| ExtractError::Io(io::Error::new(io::ErrorKind::Other, e.to_string())))?
}

async fn clear_stale_scratch_dir(dir: &Path) -> io::Result<()> {
    match tokio::fs::remove_dir_all(dir).await {
        Ok(()) => {
            log::warn!("Removed stale scratch directory {}", dir.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

async fn remove_scratch_dir(dir: &Path) {
    match tokio::fs::remove_dir_all(dir).await {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => log::warn!("Failed to remove scratch directory {}: {}", dir.display(), e),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
