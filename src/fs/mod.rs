//! Filesystem utilities for sharedvol.
//!
//! The shared filesystem is the only communication medium between hosts, so
//! everything here is about making single-file operations safe to observe
//! from another host: atomic descriptor writes, exclusive marker creation and
//! the filesystem-type guard.

pub mod atomic;
pub mod fstype;
pub mod marker;

pub use atomic::atomic_write_file;
pub use fstype::ensure_filesystem;
