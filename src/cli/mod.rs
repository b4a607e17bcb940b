//! CLI argument parsing for sharedvol.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use crate::context::Overrides;
use crate::fs::fstype::BEEGFS_MAGIC;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// sharedvol: coordinate named volumes on a filesystem shared by many hosts.
///
/// Every volume is a directory under the shared root. Hosts coordinate
/// through small marker files inside it:
/// - `<host>.lock` blocks deletion while any host holds one
/// - `<id>.mount` (or `exclusive.mount`) records who mounted the volume
#[derive(Parser, Debug)]
#[command(name = "sharedvol")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options accepted by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Shared root directory (overrides `root` in the config file).
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Host identifier for lock and mount markers (defaults to the OS hostname).
    #[arg(long, global = true)]
    pub hostname: Option<String>,

    /// YAML config file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Required filesystem magic of the root: decimal, 0x-prefixed hex, or `beegfs`.
    #[arg(long = "fs-magic", global = true, value_parser = parse_fs_magic)]
    pub fs_magic: Option<u64>,

    /// Log at debug level (RUST_LOG still wins).
    #[arg(long, global = true)]
    pub debug: bool,
}

impl GlobalArgs {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            root: self.root.clone(),
            hostname: self.hostname.clone(),
            required_filesystem_magic: self.fs_magic,
        }
    }
}

/// Available commands for sharedvol.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a volume, or report the existing one.
    ///
    /// Flags only apply when the volume is new.
    Create(CreateArgs),

    /// Remove a volume unless it is protected or locked.
    Remove(NameArgs),

    /// Mount a volume under an identifier and print its data directory.
    Mount(MountArgs),

    /// Release a mount identifier held by this host.
    Unmount(MountArgs),

    /// Show a volume's descriptor, lock holders and mounts.
    Get(GetArgs),

    /// List every volume under the shared root.
    List(ListArgs),

    /// Print a volume's data directory.
    Path(NameArgs),

    /// Lock marker commands.
    ///
    /// A lock from any host blocks removal of the volume.
    Lock(LockCommand),

    /// Print the effective configuration as YAML.
    Config,
}

/// Arguments for the `create` command.
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Volume name.
    pub name: String,

    /// Refuse removal until the flag is cleared in meta.json.
    #[arg(long)]
    pub protected: bool,

    /// Allow at most one mount at a time, from any host.
    #[arg(long)]
    pub exclusive: bool,
}

/// A command taking only a volume name.
#[derive(Args, Debug)]
pub struct NameArgs {
    /// Volume name.
    pub name: String,
}

/// Arguments for `mount` and `unmount`.
#[derive(Args, Debug)]
pub struct MountArgs {
    /// Volume name.
    pub name: String,

    /// Mount identifier, unique per mount request.
    pub id: String,
}

/// Arguments for the `get` command.
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Volume name.
    pub name: String,

    /// Print JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `list` command.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Print JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Lock management subcommands.
#[derive(Args, Debug)]
pub struct LockCommand {
    #[command(subcommand)]
    pub action: LockAction,
}

/// Lock actions, always on behalf of this host.
#[derive(Subcommand, Debug)]
pub enum LockAction {
    /// Take this host's lock marker.
    Acquire(NameArgs),

    /// Release this host's lock marker.
    Release(NameArgs),

    /// List the hosts holding a lock marker.
    List(NameArgs),
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

fn parse_fs_magic(value: &str) -> Result<u64, String> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("beegfs") {
        return Ok(BEEGFS_MAGIC);
    }

    let parsed = match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => value.parse(),
    };

    parsed.map_err(|e| format!("invalid filesystem magic '{}': {}", value, e))
}
