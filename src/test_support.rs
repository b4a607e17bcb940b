use crate::context::HostContext;
use crate::registry::VolumeRegistry;
use tempfile::TempDir;

pub(crate) const NODE_A: &str = "node-a";
pub(crate) const NODE_B: &str = "node-b";

/// A shared root with one registry per simulated host.
pub(crate) struct SharedRoot {
    pub(crate) dir: TempDir,
}

impl SharedRoot {
    pub(crate) fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// A fresh registry for `host`, as if that host's process had just started.
    pub(crate) fn host(&self, host: &str) -> VolumeRegistry {
        VolumeRegistry::new(HostContext::new(self.dir.path(), host))
    }
}
