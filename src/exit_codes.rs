//! Exit code constants for the sharedvol CLI.
//!
//! - 0: Success (including suppressed deletions)
//! - 1: User error (bad args, unknown volume, invalid config)
//! - 2: Mount conflict (already mounted, owned by another host)
//! - 3: Filesystem failure (I/O, unreadable metadata, wrong filesystem type)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, unknown volume, or invalid configuration.
pub const USER_ERROR: i32 = 1;

/// Mount conflict: the mount marker exists or belongs to another host.
pub const MOUNT_CONFLICT: i32 = 2;

/// Filesystem failure: an operation on the shared root failed.
pub const FILESYSTEM_FAILURE: i32 = 3;
