//! Mount markers.
//!
//! A mount marker records which host owns an active mount, as the file's
//! bytes. In shared mode every mount identifier gets its own
//! `_locks/<id>.mount`; in exclusive mode all identifiers collide on
//! `_locks/exclusive.mount`, so at most one mount exists volume-wide.
//!
//! Markers are created with create_new. Only the owning host may remove one.

use super::{MOUNT_SUFFIX, Volume};
use crate::error::{Result, VolumeError};
use crate::fs::marker::{any_marker, create_exclusive, list_markers, read_marker, remove_marker};
use std::collections::BTreeMap;
use std::io;

impl Volume {
    /// Claim the mount marker for `id` on behalf of `host`.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The marker was created and contains `host`
    /// * `Err(VolumeError::AlreadyMounted)` - The marker already exists
    /// * `Err(VolumeError::Io)` - Any other filesystem failure
    pub fn mount(&self, id: &str, host: &str) -> Result<()> {
        let path = self.mount_file(id);

        create_exclusive(&path, host.as_bytes()).map_err(|e| {
            if e.kind() == io::ErrorKind::AlreadyExists {
                VolumeError::AlreadyMounted(self.name.clone())
            } else {
                VolumeError::io("create mount marker", &path, e)
            }
        })?;

        tracing::info!(volume = %self.name, id, host, exclusive = self.exclusive, "mount granted");
        Ok(())
    }

    /// Release the mount marker for `id` if `host` owns it.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The marker was removed, or was already absent
    /// * `Err(VolumeError::MountOwnershipMismatch)` - Another host owns it; the
    ///   marker is left in place
    pub fn unmount(&self, id: &str, host: &str) -> Result<()> {
        let path = self.mount_file(id);

        let Some(owner) = read_marker(&path)? else {
            tracing::debug!(volume = %self.name, id, "mount marker already absent");
            return Ok(());
        };

        if owner != host {
            return Err(VolumeError::MountOwnershipMismatch {
                volume: self.name.clone(),
                owner,
            });
        }

        remove_marker(&path)?;
        tracing::info!(volume = %self.name, id, host, "mount released");
        Ok(())
    }

    /// Whether any mount marker exists.
    pub fn is_mounted(&self) -> Result<bool> {
        any_marker(&self.locks_dir(), MOUNT_SUFFIX)
    }

    /// Every active mount, keyed by identifier, mapped to the owning host.
    ///
    /// In exclusive mode the key is `exclusive`. Markers that vanish between
    /// listing and reading are skipped.
    pub fn list_mounts(&self) -> Result<BTreeMap<String, String>> {
        let locks_dir = self.locks_dir();
        let mut mounts = BTreeMap::new();

        for id in list_markers(&locks_dir, MOUNT_SUFFIX)? {
            let path = locks_dir.join(format!("{}.{}", id, MOUNT_SUFFIX));
            if let Some(owner) = read_marker(&path)? {
                mounts.insert(id, owner);
            }
        }

        Ok(mounts)
    }
}
