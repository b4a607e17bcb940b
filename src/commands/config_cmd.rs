//! Implementation of the `sharedvol config` command.

use crate::config::Config;
use crate::context::Overrides;
use crate::error::Result;

/// Execute the `sharedvol config` command.
///
/// Prints the config file merged with command-line overrides. The OS
/// hostname fallback is not applied here.
pub fn cmd_config(config: &Config, overrides: &Overrides) -> Result<()> {
    print!("{}", effective_config(config, overrides).to_yaml()?);
    Ok(())
}

pub(super) fn effective_config(config: &Config, overrides: &Overrides) -> Config {
    let mut effective = config.clone();

    if let Some(root) = &overrides.root {
        effective.root = Some(root.clone());
    }
    if let Some(hostname) = &overrides.hostname {
        effective.hostname = Some(hostname.clone());
    }
    if let Some(magic) = overrides.required_filesystem_magic {
        effective.required_filesystem_magic = Some(magic);
    }

    effective
}
