//! Configuration model for sharedvol.
//!
//! A host's configuration is an optional YAML file. It supports
//! forward-compatible parsing (unknown fields are ignored), defaults for every
//! field, and validation of values that end up in file names.

mod model;
mod operations;
pub mod types;


pub use model::Config;
pub use types::DiscoveryMode;
