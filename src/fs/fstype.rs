//! Filesystem-type guard.
//!
//! Volumes are only safe to share if the root really is the network filesystem
//! every host mounts. When a magic number is configured, create and mount
//! refuse to touch a root whose `statfs` type differs.

use crate::error::{Result, VolumeError};
use std::path::Path;

/// `statfs` magic number of BeeGFS.
pub const BEEGFS_MAGIC: u64 = 0x1983_0326;

/// Return the `statfs` filesystem type of `path`.
#[cfg(target_os = "linux")]
pub fn filesystem_magic(path: &Path) -> Result<u64> {
    let stat = nix::sys::statfs::statfs(path).map_err(|errno| {
        VolumeError::io("determine filesystem type of", path, std::io::Error::from(errno))
    })?;

    Ok(stat.filesystem_type().0 as u64)
}

#[cfg(not(target_os = "linux"))]
pub fn filesystem_magic(path: &Path) -> Result<u64> {
    Err(VolumeError::UserError(format!(
        "cannot determine filesystem type of {}: only supported on Linux",
        path.display()
    )))
}

/// Check that `path` lives on a filesystem with the `expected` magic number.
///
/// `None` disables the check.
pub fn ensure_filesystem(path: &Path, expected: Option<u64>) -> Result<()> {
    let Some(expected) = expected else {
        return Ok(());
    };

    let actual = filesystem_magic(path)?;
    tracing::debug!(path = %path.display(), actual = format_args!("{:#x}", actual), "filesystem type");

    if actual != expected {
        tracing::error!(
            path = %path.display(),
            expected = format_args!("{:#x}", expected),
            actual = format_args!("{:#x}", actual),
            "root is not on the expected filesystem"
        );
        return Err(VolumeError::NotOnExpectedFilesystem(path.to_path_buf()));
    }

    Ok(())
}
