//! Plan validation

use std::collections::HashSet;

use crate::error::{DeployError, Result};

/// Reject the first name that appears twice
///
/// # Errors
///
/// Returns `DeployError::DuplicateService` naming the repeated service.
pub fn check_unique(services: &[String]) -> Result<()> {
    let mut seen = HashSet::with_capacity(services.len());
    for name in services {
        if !seen.insert(name.as_str()) {
            return Err(DeployError::DuplicateService { name: name.clone() });
        }
    }
    Ok(())
}
