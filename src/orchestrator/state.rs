//! Run phases and per-service states

use std::collections::HashMap;
use std::fmt;

/// Run mode of a full plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Render and apply
    Deploy,
    /// Render only, no cluster mutation
    Generate,
}

/// Run-level phase
///
/// Advances strictly forward; any failure moves the run to `Aborted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    PreClean,
    ShareStorageReady,
    DepsSynced,
    NamespaceReady,
    PerServiceLoop,
    Complete,
    Aborted,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunPhase::Idle => "idle",
            RunPhase::PreClean => "pre-clean",
            RunPhase::ShareStorageReady => "share-storage",
            RunPhase::DepsSynced => "deps-sync",
            RunPhase::NamespaceReady => "namespace",
            RunPhase::PerServiceLoop => "services",
            RunPhase::Complete => "complete",
            RunPhase::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// Per-service state within one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ServiceState {
    #[default]
    Pending,
    Rendering,
    Applying,
    Done,
    Failed,
}

/// Service states for one orchestrator
#[derive(Debug, Clone, Default)]
pub struct RunState {
    services: HashMap<String, ServiceState>,
}

impl RunState {
    /// State of a service; unknown services are `Pending`
    pub fn get(&self, service: &str) -> ServiceState {
        self.services.get(service).copied().unwrap_or_default()
    }

    pub fn set(&mut self, service: &str, state: ServiceState) {
        tracing::trace!(service, ?state, "service state");
        self.services.insert(service.to_string(), state);
    }

    pub fn is_done(&self, service: &str) -> bool {
        self.get(service) == ServiceState::Done
    }

    /// Forget every service (after teardown)
    pub fn reset(&mut self) {
        self.services.clear();
    }
}
