//! Locating package files inside an extracted bundle.

use std::fs;
use std::path::{Path, PathBuf};

use crate::defaults::{ASSETS_PACKAGE_NAME, AUXILIARY_PACKAGE_EXT, SCENE_PACKAGE_NAME};
use crate::error::{Error, Result};

use super::PackageRole;

/// Find the single top-level file carrying the auxiliary extension.
///
/// Zero or several matches are a discovery error.
pub fn discover_auxiliary(dir: &Path) -> Result<PathBuf> {
    let mut matches = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        // `.unitygenerated` alone counts too, so compare on the whole name
        if has_auxiliary_marker(&entry.file_name().to_string_lossy()) {
            matches.push(entry.path());
        }
    }
    matches.sort();

    match matches.len() {
        0 => Err(Error::Discovery(format!(
            "no .{} package in {}",
            AUXILIARY_PACKAGE_EXT,
            dir.display()
        ))),
        1 => Ok(matches.remove(0)),
        _ => {
            let names: Vec<_> = matches
                .iter()
                .filter_map(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .collect();
            Err(Error::Discovery(format!(
                "multiple .{} packages in {}: {}",
                AUXILIARY_PACKAGE_EXT,
                dir.display(),
                names.join(", ")
            )))
        }
    }
}

fn has_auxiliary_marker(file_name: &str) -> bool {
    file_name
        .strip_suffix(AUXILIARY_PACKAGE_EXT)
        .is_some_and(|rest| rest.ends_with('.'))
}

/// Package file to attempt for every role. Assets and scene use fixed names
/// and are always planned, even if the file is absent.
pub fn plan_packages(dir: &Path) -> Vec<(PackageRole, Result<PathBuf>)> {
    PackageRole::ALL
        .iter()
        .map(|&role| {
            let path = match role {
                PackageRole::Assets => Ok(dir.join(ASSETS_PACKAGE_NAME)),
                PackageRole::Scene => Ok(dir.join(SCENE_PACKAGE_NAME)),
                PackageRole::Auxiliary => discover_auxiliary(dir),
            };
            (role, path)
        })
        .collect()
}
