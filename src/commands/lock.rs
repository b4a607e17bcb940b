//! Implementation of the `sharedvol lock` subcommands.

use crate::cli::NameArgs;
use crate::error::Result;
use crate::registry::VolumeRegistry;

/// Execute `sharedvol lock acquire`.
pub fn cmd_lock_acquire(registry: &VolumeRegistry, args: NameArgs) -> Result<()> {
    if registry.lock(&args.name)? {
        println!(
            "Locked volume '{}' for host '{}'.",
            args.name,
            registry.host()
        );
    } else {
        println!(
            "Volume '{}' is already locked by host '{}'.",
            args.name,
            registry.host()
        );
    }
    Ok(())
}

/// Execute `sharedvol lock release`.
///
/// Releasing a lock this host does not hold succeeds.
pub fn cmd_lock_release(registry: &VolumeRegistry, args: NameArgs) -> Result<()> {
    registry.unlock(&args.name)?;
    println!(
        "Released lock on volume '{}' for host '{}'.",
        args.name,
        registry.host()
    );
    Ok(())
}

/// Execute `sharedvol lock list`.
pub fn cmd_lock_list(registry: &VolumeRegistry, args: NameArgs) -> Result<()> {
    let locks = registry.locks(&args.name)?;

    if locks.is_empty() {
        println!("No locks on volume '{}'.", args.name);
        return Ok(());
    }

    println!("Locks on volume '{}' ({}):", args.name, locks.len());
    for host in &locks {
        println!("  {}", host);
    }
    Ok(())
}
