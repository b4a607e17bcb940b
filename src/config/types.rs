//! Configuration types and defaults for sharedvol.

use serde::{Deserialize, Serialize};

/// What reconciliation does with a volume it discovers on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryMode {
    /// Load the descriptor immediately so flags reflect `meta.json` (default).
    #[default]
    Load,
    /// Register the volume with both flags cleared until something loads it.
    Skip,
}

pub(crate) fn default_log_filter() -> String {
    "warn".to_string()
}
