//! The per-process volume registry.
//!
//! [`VolumeRegistry`] owns the in-memory map from volume name to descriptor
//! and is the entry point for every request (create, remove, mount, unmount,
//! get, list, lock). The map is a cache only: each request reconciles it with
//! the shared root first, so a negative lookup is never trusted without a
//! fresh scan.
//!
//! One mutex guards the map for the whole duration of a request, so requests
//! inside one process never interleave. Requests from other hosts still can;
//! the marker files are what arbitrates between hosts.

mod reconcile;

#[cfg(test)]
mod tests;

pub use reconcile::{prune, reconcile};

use crate::context::HostContext;
use crate::error::{Result, VolumeError};
use crate::fs::ensure_filesystem;
use crate::volume::{DeleteOutcome, Volume, validate_component};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Flags for a newly created volume.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateOptions {
    pub protected: bool,
    pub exclusive: bool,
}

/// A descriptor together with the volume's current marker state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct VolumeStatus {
    #[serde(flatten)]
    pub volume: Volume,
    pub locks: BTreeSet<String>,
    pub mounts: BTreeMap<String, String>,
}

/// In-memory registry of the volumes under one shared root, on behalf of one host.
#[derive(Debug)]
pub struct VolumeRegistry {
    ctx: HostContext,
    volumes: Mutex<BTreeMap<String, Volume>>,
}

impl VolumeRegistry {
    pub fn new(ctx: HostContext) -> Self {
        Self {
            ctx,
            volumes: Mutex::new(BTreeMap::new()),
        }
    }

    /// Identifier of the host this registry acts for.
    pub fn host(&self) -> &str {
        &self.ctx.host
    }

    pub fn root(&self) -> &Path {
        &self.ctx.root
    }

    fn volumes(&self) -> MutexGuard<'_, BTreeMap<String, Volume>> {
        self.volumes
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
    }

    fn refresh(&self, volumes: &mut BTreeMap<String, Volume>) -> Result<()> {
        reconcile(volumes, &self.ctx.root, self.ctx.discovery)?;
        Ok(())
    }

    /// Find `name` after reconciling, with its descriptor freshly reloaded.
    fn lookup(&self, volumes: &mut BTreeMap<String, Volume>, name: &str) -> Result<Volume> {
        validate_component("volume name", name)?;
        self.refresh(volumes)?;

        let Some(volume) = volumes.get_mut(name) else {
            return Err(VolumeError::UnknownVolume(name.to_string()));
        };

        if !volume.exists() {
            tracing::info!(volume = %name, "volume was removed by another host");
            volumes.remove(name);
            return Err(VolumeError::UnknownVolume(name.to_string()));
        }

        volume.reload();
        Ok(volume.clone())
    }

    fn ensure_filesystem(&self) -> Result<()> {
        ensure_filesystem(&self.ctx.root, self.ctx.required_filesystem_magic)
    }

    /// Create the volume `name`, or return the existing one.
    ///
    /// If the volume already exists, on disk or in memory, it is returned as
    /// found and `options` are ignored.
    pub fn create(&self, name: &str, options: CreateOptions) -> Result<Volume> {
        validate_component("volume name", name)?;
        tracing::info!(volume = %name, protected = options.protected, exclusive = options.exclusive, "create");

        self.ensure_filesystem()?;

        let mut volumes = self.volumes();
        if let Some(existing) = volumes.get_mut(name)
            && existing.exists()
        {
            tracing::info!(volume = %name, "cannot create volume, it already exists");
            existing.reload();
            return Ok(existing.clone());
        }

        let mut volume = Volume::new(&self.ctx.root, name)
            .with_protected(options.protected)
            .with_exclusive(options.exclusive);

        if !volume.create()? {
            // Someone else's volume: report what is on disk, not our options.
            volume = Volume::new(&self.ctx.root, name);
            volume.reload();
        }

        volumes.insert(name.to_string(), volume.clone());
        Ok(volume)
    }

    /// Remove the volume `name` unless it is mounted, protected or locked.
    ///
    /// Any mount marker, from any host, keeps the volume in place and yields
    /// [`DeleteOutcome::Mounted`]; the lock and protected gates are those of
    /// [`Volume::delete`]. Unknown volumes are reported as
    /// [`DeleteOutcome::AlreadyGone`].
    pub fn remove(&self, name: &str) -> Result<DeleteOutcome> {
        validate_component("volume name", name)?;
        tracing::info!(volume = %name, "remove");

        let mut volumes = self.volumes();
        self.refresh(&mut volumes)?;

        let Some(volume) = volumes.get_mut(name) else {
            return Ok(DeleteOutcome::AlreadyGone);
        };

        if volume.exists() && volume.is_mounted()? {
            tracing::info!(volume = %name, "volume is mounted, deletion suppressed");
            return Ok(DeleteOutcome::Mounted);
        }

        let outcome = volume.delete()?;
        if matches!(outcome, DeleteOutcome::Removed | DeleteOutcome::AlreadyGone) {
            volumes.remove(name);
        }

        Ok(outcome)
    }

    /// Descriptor, lock holders and mounts of `name`.
    pub fn get(&self, name: &str) -> Result<VolumeStatus> {
        tracing::debug!(volume = %name, "get");

        let mut volumes = self.volumes();
        let volume = self.lookup(&mut volumes, name)?;

        Ok(VolumeStatus {
            locks: volume.list_locks()?,
            mounts: volume.list_mounts()?,
            volume,
        })
    }

    /// Every volume under the root, after reconciling and pruning.
    pub fn list(&self) -> Result<Vec<Volume>> {
        tracing::debug!("list");

        let mut volumes = self.volumes();
        self.refresh(&mut volumes)?;
        prune(&mut volumes);

        Ok(volumes.values().cloned().collect())
    }

    /// Data directory of `name`.
    pub fn path(&self, name: &str) -> Result<PathBuf> {
        let mut volumes = self.volumes();
        Ok(self.lookup(&mut volumes, name)?.data_dir())
    }

    /// Mount `name` under identifier `id` for this host.
    ///
    /// Lock markers are not touched. Returns the data directory to bind.
    pub fn mount(&self, name: &str, id: &str) -> Result<PathBuf> {
        validate_component("mount id", id)?;
        tracing::info!(volume = %name, id, "mount");

        self.ensure_filesystem()?;

        let mut volumes = self.volumes();
        let volume = self.lookup(&mut volumes, name)?;
        volume.mount(id, self.host())?;

        Ok(volume.data_dir())
    }

    /// Release identifier `id` on `name` if this host owns it.
    ///
    /// An absent marker is success. Lock markers are not touched.
    pub fn unmount(&self, name: &str, id: &str) -> Result<()> {
        validate_component("mount id", id)?;
        tracing::info!(volume = %name, id, "unmount");

        let mut volumes = self.volumes();
        let volume = self.lookup(&mut volumes, name)?;
        volume.unmount(id, self.host())
    }

    /// Take this host's lock marker on `name`.
    ///
    /// Returns `false` if this host already held it.
    pub fn lock(&self, name: &str) -> Result<bool> {
        let mut volumes = self.volumes();
        let volume = self.lookup(&mut volumes, name)?;
        let newly_locked = !volume.has_lock(self.host());
        volume.lock(self.host())?;
        tracing::info!(volume = %name, host = %self.host(), newly_locked, "volume locked");
        Ok(newly_locked)
    }

    /// Release this host's lock marker on `name`.
    pub fn unlock(&self, name: &str) -> Result<()> {
        let mut volumes = self.volumes();
        let volume = self.lookup(&mut volumes, name)?;
        volume.unlock(self.host())?;
        tracing::info!(volume = %name, host = %self.host(), "volume unlocked");
        Ok(())
    }

    /// Every host holding a lock marker on `name`.
    pub fn locks(&self, name: &str) -> Result<BTreeSet<String>> {
        let mut volumes = self.volumes();
        self.lookup(&mut volumes, name)?.list_locks()
    }
}
