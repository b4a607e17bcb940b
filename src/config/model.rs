//! Config struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for a sharedvol host.
///
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Shared root directory where volumes are created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,

    /// Host identifier used for lock and mount markers.
    /// Falls back to the OS hostname.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,

    /// Required `statfs` magic of the root (BeeGFS is `0x19830326`).
    /// Unset disables the check.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_filesystem_magic: Option<u64>,

    /// Whether discovered volumes have their descriptor loaded right away.
    #[serde(default)]
    pub discovery: DiscoveryMode,

    /// Default tracing filter, overridden by `RUST_LOG` and `--debug`.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: None,
            hostname: None,
            required_filesystem_magic: None,
            discovery: DiscoveryMode::default(),
            log_filter: default_log_filter(),
        }
    }
}
