//! Descriptor persistence (`meta.json`).

use super::Volume;
use crate::error::{Result, VolumeError};
use crate::fs::atomic_write_file;
use std::fs;

impl Volume {
    /// Persist the descriptor, replacing `meta.json` atomically.
    pub fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            VolumeError::Metadata(format!("failed to serialize volume {}: {}", self.name, e))
        })?;

        atomic_write_file(self.metadata_path(), &json)
    }

    /// Reload every field from `meta.json`.
    ///
    /// On error `self` is left untouched, so the caller keeps whatever it
    /// already had. The directory the document was read from stays
    /// authoritative for `name` and `mountpoint`: a disagreeing document is
    /// logged and those two fields are kept.
    pub fn load(&mut self) -> Result<()> {
        let path = self.metadata_path();

        let content = fs::read_to_string(&path)
            .map_err(|e| VolumeError::io("read volume metadata", &path, e))?;

        let stored: Volume = serde_json::from_str(&content).map_err(|e| {
            VolumeError::Metadata(format!("failed to parse '{}': {}", path.display(), e))
        })?;

        if stored.name != self.name || stored.mountpoint != self.mountpoint {
            tracing::warn!(
                volume = %self.name,
                stored_name = %stored.name,
                stored_mountpoint = %stored.mountpoint.display(),
                "metadata describes a different location, keeping directory identity"
            );
        }

        self.created_at = stored.created_at;
        self.protected = stored.protected;
        self.exclusive = stored.exclusive;

        Ok(())
    }

    /// Reload from disk, logging and keeping in-memory values on failure.
    pub fn reload(&mut self) {
        if let Err(e) = self.load() {
            tracing::debug!(volume = %self.name, error = %e, "descriptor unavailable, using in-memory values");
        }
    }
}
