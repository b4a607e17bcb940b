//! Per-host lock markers.
//!
//! A lock marker (`_locks/<host>.lock`) says "this host currently claims the
//! volume". Markers are binary, not reference counted, and carry no payload.
//! They are created with plain create-or-truncate, so two hosts locking at once
//! both succeed. Locks are advisory: only deletion consults them.
//!
//! There is no lease or expiry. A crashed host's marker stays until someone
//! unlocks it.

use super::{LOCK_SUFFIX, Volume};
use crate::error::Result;
use crate::fs::marker::{any_marker, list_markers, remove_marker, touch};
use std::collections::BTreeSet;

impl Volume {
    /// Ensure a lock marker for `host` exists. Re-locking is a no-op.
    pub fn lock(&self, host: &str) -> Result<()> {
        touch(&self.lock_file(host))?;
        tracing::debug!(volume = %self.name, host, "lock marker present");
        Ok(())
    }

    /// Remove the lock marker for `host`, if any. Other hosts' markers are
    /// never touched.
    pub fn unlock(&self, host: &str) -> Result<()> {
        if remove_marker(&self.lock_file(host))? {
            tracing::debug!(volume = %self.name, host, "lock marker removed");
        }
        Ok(())
    }

    /// Whether `host` holds a lock marker.
    pub fn has_lock(&self, host: &str) -> bool {
        self.lock_file(host).is_file()
    }

    /// Whether any host holds the volume locked.
    ///
    /// Every `*.lock` file counts, including ones whose name is not valid
    /// UTF-8 and so never shows up in [`Volume::list_locks`]. An error means the lock directory could not be read; callers must treat
    /// that as "presume locked".
    pub fn is_locked(&self) -> Result<bool> {
        any_marker(&self.locks_dir(), LOCK_SUFFIX)
    }

    /// Every host currently holding a lock marker.
    pub fn list_locks(&self) -> Result<BTreeSet<String>> {
        Ok(list_markers(&self.locks_dir(), LOCK_SUFFIX)?
            .into_iter()
            .collect())
    }
}
