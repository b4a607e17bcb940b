//! Error types for sharedvol.
//!
//! Uses thiserror for derive macros. Filesystem failures keep the original
//! `io::Error` as their source so callers can still inspect its kind.

use crate::exit_codes;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for volume operations.
#[derive(Error, Debug)]
pub enum VolumeError {
    /// User provided invalid arguments or configuration.
    #[error("{0}")]
    UserError(String),

    /// No volume with this name exists under the root, even after a rescan.
    #[error("volume {0} unknown")]
    UnknownVolume(String),

    /// The volume path exists but is something other than a directory.
    #[error("{} already exists and it's not a directory", .0.display())]
    NotADirectory(PathBuf),

    /// The root does not live on the filesystem type the host requires.
    #[error("{} is not on the expected filesystem", .0.display())]
    NotOnExpectedFilesystem(PathBuf),

    /// The mount marker could not be created because it already exists.
    #[error("volume {0} is already mounted")]
    AlreadyMounted(String),

    /// The mount marker belongs to another host.
    #[error("volume {volume} is mounted by {owner} host")]
    MountOwnershipMismatch { volume: String, owner: String },

    /// The volume descriptor could not be read, parsed or serialized.
    #[error("metadata error: {0}")]
    Metadata(String),

    /// An underlying filesystem operation failed.
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl VolumeError {
    /// Wrap an `io::Error` with a short description of what was attempted.
    pub fn io(action: &str, path: &Path, source: std::io::Error) -> Self {
        VolumeError::Io {
            context: format!("failed to {} '{}'", action, path.display()),
            source,
        }
    }

    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            VolumeError::UserError(_)
            | VolumeError::UnknownVolume(_)
            | VolumeError::NotADirectory(_) => exit_codes::USER_ERROR,
            VolumeError::AlreadyMounted(_) | VolumeError::MountOwnershipMismatch { .. } => {
                exit_codes::MOUNT_CONFLICT
            }
            VolumeError::NotOnExpectedFilesystem(_)
            | VolumeError::Metadata(_)
            | VolumeError::Io { .. } => exit_codes::FILESYSTEM_FAILURE,
        }
    }

    /// True if this is an I/O error of the given kind.
    #[cfg(test)]
    pub fn is_io_kind(&self, kind: std::io::ErrorKind) -> bool {
        matches!(self, VolumeError::Io { source, .. } if source.kind() == kind)
    }
}

/// Result type alias for volume operations.
pub type Result<T> = std::result::Result<T, VolumeError>;
