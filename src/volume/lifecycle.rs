//! Volume creation and gated deletion.

use super::Volume;
use crate::error::{Result, VolumeError};
use chrono::Utc;
use std::fs;
use std::io;

/// What `delete` did. Every variant is a success from the caller's view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The whole volume tree was removed.
    Removed,
    /// The reloaded descriptor is protected; nothing was touched.
    Protected,
    /// At least one host holds a lock marker; nothing was touched.
    Locked,
    /// The volume directory did not exist.
    AlreadyGone,
    /// A mount marker exists; nothing was touched. Only the registry's
    /// request-level removal reports this.
    Mounted,
}

impl DeleteOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeleteOutcome::Removed => "removed",
            DeleteOutcome::Protected => "protected",
            DeleteOutcome::Locked => "locked",
            DeleteOutcome::AlreadyGone => "already gone",
            DeleteOutcome::Mounted => "mounted",
        }
    }
}

impl Volume {
    /// Create the volume directory structure and persist the descriptor.
    ///
    /// An existing directory is accepted as is: neither its structure nor its
    /// descriptor is rewritten, since another host may own that state. A
    /// failure part way through removes the partially created mountpoint.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The volume was created
    /// * `Ok(false)` - A directory already existed at the mountpoint
    /// * `Err(VolumeError::NotADirectory)` - Something else exists there
    pub fn create(&mut self) -> Result<bool> {
        match fs::symlink_metadata(&self.mountpoint) {
            Ok(meta) if meta.is_dir() => {
                tracing::info!(volume = %self.name, "volume directory already exists");
                return Ok(false);
            }
            Ok(_) => return Err(VolumeError::NotADirectory(self.mountpoint.clone())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(VolumeError::io("stat", &self.mountpoint, e)),
        }

        if let Some(parent) = self.mountpoint.parent() {
            fs::create_dir_all(parent).map_err(|e| VolumeError::io("create directory", parent, e))?;
        }

        // Losing a concurrent create must never roll back the winner's volume.
        match fs::create_dir(&self.mountpoint) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                tracing::info!(volume = %self.name, "volume created concurrently by another host");
                return Ok(false);
            }
            Err(e) => return Err(VolumeError::io("create directory", &self.mountpoint, e)),
        }

        if self.created_at.is_none() {
            self.created_at = Some(Utc::now());
        }

        if let Err(e) = self.create_structure() {
            let _ = fs::remove_dir_all(&self.mountpoint);
            return Err(e);
        }

        tracing::info!(volume = %self.name, "volume created");
        Ok(true)
    }

    fn create_structure(&self) -> Result<()> {
        for dir in [self.data_dir(), self.locks_dir()] {
            fs::create_dir(&dir).map_err(|e| VolumeError::io("create directory", &dir, e))?;
        }

        self.save()
    }

    /// Delete the volume tree if nothing protects or locks it.
    ///
    /// The descriptor is reloaded first: another host may have set the
    /// protected flag directly on the shared filesystem. If the lock directory
    /// cannot be read the volume is kept and the error returned.
    ///
    /// The lock check and the removal are not atomic; a host locking in between
    /// can still lose its volume.
    pub fn delete(&mut self) -> Result<DeleteOutcome> {
        self.reload();

        if self.protected {
            tracing::info!(volume = %self.name, "volume is protected, deletion suppressed");
            return Ok(DeleteOutcome::Protected);
        }

        match fs::metadata(&self.mountpoint) {
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Ok(DeleteOutcome::AlreadyGone);
            }
            Err(e) => return Err(VolumeError::io("stat", &self.mountpoint, e)),
        }

        if self.is_locked()? {
            tracing::info!(volume = %self.name, "volume is locked, deletion suppressed");
            return Ok(DeleteOutcome::Locked);
        }

        fs::remove_dir_all(&self.mountpoint)
            .map_err(|e| VolumeError::io("remove volume", &self.mountpoint, e))?;

        tracing::info!(volume = %self.name, "volume removed");
        Ok(DeleteOutcome::Removed)
    }
}
