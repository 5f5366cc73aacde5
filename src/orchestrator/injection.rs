//! Scoped sidecar injection toggle

use crate::cluster::{Cluster, InjectionMode};
use crate::error::Result;

/// Injection disabled for the namespace until released
///
/// Call [`release`](Self::release) on every exit path to re-enable injection
/// and observe the result; if the guard is dropped unreleased (a panic while
/// applying) injection is re-enabled on drop and a failure is only logged.
#[must_use = "injection stays disabled until the guard is released"]
pub struct InjectionGuard<'c, 'a> {
    cluster: &'c Cluster<'a>,
    released: bool,
}

impl<'c, 'a> InjectionGuard<'c, 'a> {
    /// Disable injection for the cluster's namespace
    pub fn acquire(cluster: &'c Cluster<'a>) -> Result<Self> {
        cluster.set_injection(InjectionMode::Disabled)?;
        Ok(Self {
            cluster,
            released: false,
        })
    }

    /// Re-enable injection
    pub fn release(mut self) -> Result<()> {
        self.released = true;
        self.cluster.set_injection(InjectionMode::Enabled)
    }
}

impl Drop for InjectionGuard<'_, '_> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = self.cluster.set_injection(InjectionMode::Enabled) {
            tracing::warn!(namespace = %self.cluster.namespace(), error = %e, "failed to re-enable sidecar injection");
        }
    }
}
