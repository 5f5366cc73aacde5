//! Deployment plan resolution
//!
//! This module handles:
//! - Selecting services from `enable`/`disable` selectors
//! - Prepending mandatory dependencies
//! - Reordering by priority tier
//! - Rejecting plans that name a service twice
//!
//! ## Algorithm
//!
//! ```text
//! selection        = enabled groups ∪ enabled services   (or every declared service)
//! combined         = missing must_deps ++ selection
//! plan             = high ++ mid ++ low ++ base          (stable partition of combined)
//! ```
//!
//! The plan is computed once per run, before any side effect.

pub mod priority;
pub mod selection;
pub mod validation;

use serde::Serialize;

use crate::config::DeployConfig;
use crate::error::Result;

pub use priority::partition_by_priority;
pub use selection::{inject_mandatory, select_services};

/// Ordered, duplicate-free list of services to deploy
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DeploymentPlan {
    services: Vec<String>,
}

impl DeploymentPlan {
    /// Build a plan, failing on the first repeated name
    pub fn new(services: Vec<String>) -> Result<Self> {
        validation::check_unique(&services)?;
        Ok(Self { services })
    }

    #[cfg(test)]
    pub fn services(&self) -> &[String] {
        &self.services
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.services.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

/// Resolve the deployment plan for a configuration
///
/// # Errors
///
/// Returns `DeployError::DuplicateService` if any service would be deployed
/// twice.
pub fn resolve(config: &DeployConfig) -> Result<DeploymentPlan> {
    let selected = select_services(config);
    let combined = inject_mandatory(config, selected);
    let ordered = partition_by_priority(config, combined);
    tracing::debug!(plan = ?ordered, "resolved deployment order");
    DeploymentPlan::new(ordered)
}
