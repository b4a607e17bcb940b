//! Marker files on the shared filesystem.
//!
//! Marker files are the only synchronization primitive between hosts. Their
//! existence carries the meaning; an optional payload names the owner.
//!
//! - [`create_exclusive`] uses **create_new** semantics: it fails with
//!   `AlreadyExists` if the marker is already there. Exclusivity is only as
//!   strong as the shared filesystem's atomic create-if-absent support.
//! - [`touch`] is a plain create-or-truncate and never fails on an existing
//!   marker.

use crate::error::{Result, VolumeError};
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

/// Create a marker exclusively and write `payload` into it.
///
/// The raw `io::Error` is returned so callers can tell `AlreadyExists` apart
/// from other failures.
pub fn create_exclusive(path: &Path, payload: &[u8]) -> io::Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)?;

    if let Err(e) = file.write_all(payload).and_then(|()| file.sync_all()) {
        // Never leave a marker without its owner behind.
        let _ = fs::remove_file(path);
        return Err(e);
    }

    Ok(())
}

/// Ensure an empty marker exists, creating or truncating it.
pub fn touch(path: &Path) -> Result<()> {
    File::create(path).map_err(|e| VolumeError::io("create marker", path, e))?;
    Ok(())
}

/// Read a marker's payload. Returns `Ok(None)` if the marker does not exist.
pub fn read_marker(path: &Path) -> Result<Option<String>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(VolumeError::io("read marker", path, e)),
    }
}

/// Remove a marker. Returns `Ok(false)` if it was already absent.
pub fn remove_marker(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(VolumeError::io("remove marker", path, e)),
    }
}

/// Names of every non-directory entry in `dir` ending in `.{suffix}`.
///
/// The suffix is matched on the raw name, so entries that are not valid UTF-8
/// are included.
fn marker_names(dir: &Path, suffix: &str) -> Result<Vec<OsString>> {
    let entries = fs::read_dir(dir).map_err(|e| VolumeError::io("read directory", dir, e))?;
    let dotted = format!(".{}", suffix);

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| VolumeError::io("read directory entry in", dir, e))?;

        let file_type = entry
            .file_type()
            .map_err(|e| VolumeError::io("stat", &entry.path(), e))?;
        if file_type.is_dir() {
            continue;
        }

        let name = entry.file_name();
        if name.as_encoded_bytes().ends_with(dotted.as_bytes()) {
            names.push(name);
        }
    }

    Ok(names)
}

/// Whether `dir` holds at least one marker ending in `.{suffix}`, whatever
/// its name.
pub fn any_marker(dir: &Path, suffix: &str) -> Result<bool> {
    Ok(!marker_names(dir, suffix)?.is_empty())
}

/// List the stems of every non-directory entry in `dir` ending in `.{suffix}`.
///
/// Stems are returned sorted. Markers whose names are not valid UTF-8 are
/// logged and left out; [`any_marker`] still counts them.
pub fn list_markers(dir: &Path, suffix: &str) -> Result<Vec<String>> {
    let dotted = format!(".{}", suffix);

    let mut stems = Vec::new();
    for name in marker_names(dir, suffix)? {
        let Some(name) = name.to_str() else {
            tracing::warn!(dir = %dir.display(), name = ?name, "skipping marker with non UTF-8 name");
            continue;
        };
        if let Some(stem) = name.strip_suffix(dotted.as_str()) {
            stems.push(stem.to_string());
        }
    }

    stems.sort();
    Ok(stems)
}
