//! Implementation of `sharedvol mount` and `sharedvol unmount`.

use crate::cli::MountArgs;
use crate::error::Result;
use crate::registry::VolumeRegistry;

/// Execute the `sharedvol mount` command.
///
/// Prints the data directory, which is what the caller binds.
pub fn cmd_mount(registry: &VolumeRegistry, args: MountArgs) -> Result<()> {
    let data_dir = registry.mount(&args.name, &args.id)?;
    println!("{}", data_dir.display());
    Ok(())
}

/// Execute the `sharedvol unmount` command.
pub fn cmd_unmount(registry: &VolumeRegistry, args: MountArgs) -> Result<()> {
    registry.unmount(&args.name, &args.id)?;
    println!("Unmounted '{}' from volume '{}'.", args.id, args.name);
    Ok(())
}
