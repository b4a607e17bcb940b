//! Command implementations for sharedvol.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations. Every command except `config` runs against a
//! [`VolumeRegistry`] built from the resolved host context.

mod config_cmd;
mod lock;
mod mount;
mod volume;


use crate::cli::{Cli, Command, LockAction};
use crate::config::Config;
use crate::context::HostContext;
use crate::error::{Result, VolumeError};
use crate::registry::VolumeRegistry;
use serde::Serialize;

/// Dispatch a command to its implementation.
pub fn dispatch(cli: Cli, config: &Config) -> Result<()> {
    let overrides = cli.global.overrides();

    let registry = || -> Result<VolumeRegistry> {
        let ctx = HostContext::resolve(config, &overrides)?;
        tracing::debug!(root = %ctx.root.display(), host = %ctx.host, "resolved host context");
        Ok(VolumeRegistry::new(ctx))
    };

    match cli.command {
        Command::Create(args) => volume::cmd_create(&registry()?, args),
        Command::Remove(args) => volume::cmd_remove(&registry()?, args),
        Command::Get(args) => volume::cmd_get(&registry()?, args),
        Command::List(args) => volume::cmd_list(&registry()?, args),
        Command::Path(args) => volume::cmd_path(&registry()?, args),
        Command::Mount(args) => mount::cmd_mount(&registry()?, args),
        Command::Unmount(args) => mount::cmd_unmount(&registry()?, args),
        Command::Lock(lock_cmd) => match lock_cmd.action {
            LockAction::Acquire(args) => lock::cmd_lock_acquire(&registry()?, args),
            LockAction::Release(args) => lock::cmd_lock_release(&registry()?, args),
            LockAction::List(args) => lock::cmd_lock_list(&registry()?, args),
        },
        Command::Config => config_cmd::cmd_config(config, &overrides),
    }
}

/// Pretty JSON for `--json` output.
fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| VolumeError::Metadata(format!("failed to serialize output: {}", e)))
}
