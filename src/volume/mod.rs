//! Shared volumes and their on-disk layout.
//!
//! A volume is a directory directly under the shared root:
//!
//! ```text
//! <root>/<name>/
//!   meta.json          descriptor (name, mountpoint, protected, exclusive)
//!   _data/             payload, never touched here
//!   _locks/
//!     <host>.lock      empty marker, host holds the volume
//!     <id>.mount       owning host id (shared mode)
//!     exclusive.mount  owning host id (exclusive mode)
//! ```
//!
//! The directory tree is the ground truth. Every host may change it, so
//! nothing read from it is cached across operations.
//!
//! # Submodules
//!
//! - `metadata`: descriptor persistence (`save`/`load`)
//! - `locks`: per-host lock markers
//! - `mounts`: per-identifier (or exclusive) mount markers
//! - `lifecycle`: creation and gated deletion

mod lifecycle;
mod locks;
mod metadata;
mod mounts;


pub use lifecycle::DeleteOutcome;

use crate::error::{Result, VolumeError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the payload directory inside a volume.
pub const DATA_DIR: &str = "_data";

/// Name of the marker directory inside a volume.
pub const LOCKS_DIR: &str = "_locks";

/// Name of the descriptor file inside a volume.
pub const METADATA_FILE: &str = "meta.json";

/// Marker name shared by every identifier in exclusive mode.
pub const EXCLUSIVE_MOUNT_ID: &str = "exclusive";

/// Suffix of lock marker files.
pub const LOCK_SUFFIX: &str = "lock";

/// Suffix of mount marker files.
pub const MOUNT_SUFFIX: &str = "mount";

/// The descriptor of a single shared volume.
///
/// Serialized as `meta.json` with the key spelling older deployments wrote
/// (`Name`, `Mountpoint`, `CreatedAt`, `Protected`, `Exclusive`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Volume {
    /// Unique name within the root.
    pub name: String,

    /// Absolute path of the volume directory (`root/name`).
    pub mountpoint: PathBuf,

    /// When the volume was first created, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// Blocks deletion unconditionally.
    #[serde(default)]
    pub protected: bool,

    /// Only one mount identifier may be active at a time.
    #[serde(default)]
    pub exclusive: bool,
}

impl Volume {
    /// Describe the volume `name` under `root`, with both flags cleared.
    pub fn new(root: &Path, name: &str) -> Self {
        Self {
            name: name.to_string(),
            mountpoint: root.join(name),
            created_at: None,
            protected: false,
            exclusive: false,
        }
    }

    /// Set the protected flag.
    pub fn with_protected(mut self, protected: bool) -> Self {
        self.protected = protected;
        self
    }

    /// Set the exclusive flag.
    pub fn with_exclusive(mut self, exclusive: bool) -> Self {
        self.exclusive = exclusive;
        self
    }

    pub fn data_dir(&self) -> PathBuf {
        self.mountpoint.join(DATA_DIR)
    }

    pub fn locks_dir(&self) -> PathBuf {
        self.mountpoint.join(LOCKS_DIR)
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.mountpoint.join(METADATA_FILE)
    }

    /// Path of the lock marker for `host`.
    pub fn lock_file(&self, host: &str) -> PathBuf {
        self.locks_dir().join(format!("{}.{}", host, LOCK_SUFFIX))
    }

    /// Path of the mount marker for `id`.
    ///
    /// In exclusive mode every identifier maps to the same marker.
    pub fn mount_file(&self, id: &str) -> PathBuf {
        let id = if self.exclusive { EXCLUSIVE_MOUNT_ID } else { id };
        self.locks_dir().join(format!("{}.{}", id, MOUNT_SUFFIX))
    }

    /// Whether the volume directory currently exists.
    pub fn exists(&self) -> bool {
        self.mountpoint.is_dir()
    }
}

impl std::fmt::Display for Volume {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}{}{})",
            self.name,
            self.mountpoint.display(),
            if self.protected { ", protected" } else { "" },
            if self.exclusive { ", exclusive" } else { "" }
        )
    }
}

/// Check that `value` can be used as a single file name component.
///
/// Volume names, host identifiers and mount identifiers all end up in paths
/// under the shared root.
pub fn validate_component(kind: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(VolumeError::UserError(format!("{} must not be empty", kind)));
    }
    if value == "." || value == ".." || value.contains(['/', '\\', '\0']) {
        return Err(VolumeError::UserError(format!(
            "{} '{}' must be a single path component",
            kind, value
        )));
    }
    Ok(())
}
