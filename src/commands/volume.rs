//! Implementation of the volume commands: `create`, `remove`, `get`, `list`
//! and `path`.

use super::to_json;
use crate::cli::{CreateArgs, GetArgs, ListArgs, NameArgs};
use crate::error::Result;
use crate::registry::{CreateOptions, VolumeRegistry, VolumeStatus};
use crate::volume::Volume;

/// Execute the `sharedvol create` command.
pub fn cmd_create(registry: &VolumeRegistry, args: CreateArgs) -> Result<()> {
    let volume = registry.create(
        &args.name,
        CreateOptions {
            protected: args.protected,
            exclusive: args.exclusive,
        },
    )?;

    println!("{}", volume);
    Ok(())
}

/// Execute the `sharedvol remove` command.
///
/// A suppressed removal still succeeds; the outcome is printed.
pub fn cmd_remove(registry: &VolumeRegistry, args: NameArgs) -> Result<()> {
    let outcome = registry.remove(&args.name)?;
    println!("{}: {}", args.name, outcome.as_str());
    Ok(())
}

/// Execute the `sharedvol get` command.
pub fn cmd_get(registry: &VolumeRegistry, args: GetArgs) -> Result<()> {
    let status = registry.get(&args.name)?;

    if args.json {
        println!("{}", to_json(&status)?);
    } else {
        print!("{}", render_status(&status));
    }
    Ok(())
}

/// Execute the `sharedvol list` command.
pub fn cmd_list(registry: &VolumeRegistry, args: ListArgs) -> Result<()> {
    let volumes = registry.list()?;

    if args.json {
        println!("{}", to_json(&volumes)?);
        return Ok(());
    }

    if volumes.is_empty() {
        println!("No volumes under {}.", registry.root().display());
        return Ok(());
    }

    for volume in &volumes {
        println!("{}", render_list_entry(volume)?);
    }
    Ok(())
}

/// Execute the `sharedvol path` command.
pub fn cmd_path(registry: &VolumeRegistry, args: NameArgs) -> Result<()> {
    println!("{}", registry.path(&args.name)?.display());
    Ok(())
}

fn render_list_entry(volume: &Volume) -> Result<String> {
    if volume.is_mounted()? {
        Ok(format!("{} [mounted]", volume))
    } else {
        Ok(volume.to_string())
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

pub(super) fn render_status(status: &VolumeStatus) -> String {
    let volume = &status.volume;
    let mut out = String::new();

    out.push_str(&format!("Name:       {}\n", volume.name));
    out.push_str(&format!("Mountpoint: {}\n", volume.mountpoint.display()));
    if let Some(created) = volume.created_at {
        out.push_str(&format!(
            "Created:    {}\n",
            created.format("%Y-%m-%d %H:%M:%S UTC")
        ));
    }
    out.push_str(&format!("Protected:  {}\n", yes_no(volume.protected)));
    out.push_str(&format!("Exclusive:  {}\n", yes_no(volume.exclusive)));

    if status.locks.is_empty() {
        out.push_str("Locks:      (none)\n");
    } else {
        let hosts: Vec<&str> = status.locks.iter().map(String::as_str).collect();
        out.push_str(&format!("Locks:      {}\n", hosts.join(", ")));
    }

    if status.mounts.is_empty() {
        out.push_str("Mounts:     (none)\n");
    } else {
        out.push_str("Mounts:\n");
        for (id, host) in &status.mounts {
            out.push_str(&format!("  {} -> {}\n", id, host));
        }
    }

    out
}
