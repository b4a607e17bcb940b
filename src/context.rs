//! Host context resolution for sharedvol.
//!
//! Every operation needs two facts from its environment: the shared root
//! (mounted at the same path on every host) and a stable identifier for this
//! host, used to name lock markers and fill mount markers. This module
//! resolves both from command-line overrides, the config file and the OS.

use crate::config::{Config, DiscoveryMode};
use crate::error::{Result, VolumeError};
use crate::volume::validate_component;
use std::path::{Path, PathBuf};

/// Values given on the command line, which take precedence over the config.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub root: Option<PathBuf>,
    pub hostname: Option<String>,
    pub required_filesystem_magic: Option<u64>,
}

/// Resolved settings for the host running this process.
#[derive(Debug, Clone)]
pub struct HostContext {
    /// Absolute path to the shared root.
    pub root: PathBuf,

    /// Identifier of this host in lock and mount markers.
    pub host: String,

    /// Required `statfs` magic of the root, if any.
    pub required_filesystem_magic: Option<u64>,

    /// How newly discovered volumes are registered.
    pub discovery: DiscoveryMode,
}

impl HostContext {
    /// Build a context directly, with no filesystem guard and eager discovery.
    pub fn new<P: AsRef<Path>>(root: P, host: &str) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            host: host.to_string(),
            required_filesystem_magic: None,
            discovery: DiscoveryMode::default(),
        }
    }

    /// Resolve the context from command-line overrides and the config file.
    ///
    /// # Returns
    ///
    /// * `Ok(HostContext)` - Root made absolute, host identifier validated
    /// * `Err(VolumeError::UserError)` - No root configured, or no usable host id
    pub fn resolve(config: &Config, overrides: &Overrides) -> Result<Self> {
        let root = overrides
            .root
            .clone()
            .or_else(|| config.root.clone())
            .ok_or_else(|| {
                VolumeError::UserError(
                    "no shared root configured.\n\n\
                     Pass --root <dir> or set `root` in the config file."
                        .to_string(),
                )
            })?;

        let root = std::path::absolute(&root).map_err(|e| {
            VolumeError::UserError(format!(
                "failed to resolve root '{}': {}",
                root.display(),
                e
            ))
        })?;

        let host = match overrides.hostname.clone().or_else(|| config.hostname.clone()) {
            Some(host) => host,
            None => os_hostname()?,
        };
        validate_component("hostname", &host)?;

        let mut ctx = Self::new(root, &host);
        ctx.required_filesystem_magic = overrides
            .required_filesystem_magic
            .or(config.required_filesystem_magic);
        ctx.discovery = config.discovery;
        Ok(ctx)
    }
}

fn os_hostname() -> Result<String> {
    let host = hostname::get().map_err(|e| {
        VolumeError::UserError(format!(
            "could not determine hostname ({}); pass --hostname",
            e
        ))
    })?;

    host.into_string().map_err(|_| {
        VolumeError::UserError("hostname is not valid UTF-8; pass --hostname".to_string())
    })
}
