//! Rebuilding the in-memory volume map from the shared root.
//!
//! The filesystem is the single source of truth. [`reconcile`] adds every
//! directory under the root that the map does not know yet; [`prune`] drops
//! map entries whose directory has disappeared.

use crate::config::DiscoveryMode;
use crate::error::{Result, VolumeError};
use crate::volume::Volume;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Register every unknown directory directly under `root` as a volume.
///
/// Existing entries are left alone. With [`DiscoveryMode::Load`] each new entry
/// has its descriptor loaded; a missing or malformed `meta.json` leaves both
/// flags cleared.
///
/// Returns the names that were added, sorted.
pub fn reconcile(
    volumes: &mut BTreeMap<String, Volume>,
    root: &Path,
    mode: DiscoveryMode,
) -> Result<Vec<String>> {
    let entries = fs::read_dir(root).map_err(|e| VolumeError::io("read directory", root, e))?;

    let mut discovered = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| VolumeError::io("read directory entry in", root, e))?;

        let file_type = entry
            .file_type()
            .map_err(|e| VolumeError::io("stat", &entry.path(), e))?;
        if !file_type.is_dir() {
            continue;
        }

        let Ok(name) = entry.file_name().into_string() else {
            tracing::warn!(path = %entry.path().display(), "skipping directory with non UTF-8 name");
            continue;
        };
        if volumes.contains_key(&name) {
            continue;
        }

        let mut volume = Volume::new(root, &name);
        if mode == DiscoveryMode::Load {
            volume.reload();
        }

        tracing::info!(volume = %name, "discovered volume");
        volumes.insert(name.clone(), volume);
        discovered.push(name);
    }

    discovered.sort();
    Ok(discovered)
}

/// Drop every entry whose volume directory no longer exists.
///
/// Returns the names that were removed, sorted.
pub fn prune(volumes: &mut BTreeMap<String, Volume>) -> Vec<String> {
    let mut removed = Vec::new();

    volumes.retain(|name, volume| {
        if volume.exists() {
            return true;
        }
        tracing::info!(volume = %name, "volume was removed by another host");
        removed.push(name.clone());
        false
    });

    removed
}
