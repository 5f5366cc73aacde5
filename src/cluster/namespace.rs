//! Target namespace

use std::fmt;
use std::path::Path;

use crate::config::DeployConfig;
use crate::error::{DeployError, Result};
use crate::exec::CommandRunner;

/// Namespace that is never deleted by teardown
pub const DEFAULT_NAMESPACE: &str = "default";

/// Namespace every cluster command is scoped to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace(String);

impl Namespace {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `default` and the empty name are kept on teardown
    pub fn is_reserved(&self) -> bool {
        self.0.is_empty() || self.0 == DEFAULT_NAMESPACE
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolve the namespace for this run
///
/// Order: explicit override, then `vars.namespace`, then the current user
/// name as reported by `whoami`.
///
/// # Errors
///
/// Returns `DeployError::NamespaceUnresolved` if every source is empty.
pub fn resolve_namespace(
    override_ns: Option<&str>,
    config: &DeployConfig,
    runner: &dyn CommandRunner,
) -> Result<Namespace> {
    if let Some(ns) = override_ns.map(str::trim).filter(|ns| !ns.is_empty()) {
        return Ok(Namespace::new(ns));
    }
    if let Some(ns) = config.declared_namespace() {
        return Ok(Namespace::new(ns));
    }

    let user = match runner.run("whoami", Path::new("/")) {
        Ok(output) if output.success() => output.stdout.trim().to_string(),
        Ok(output) => {
            tracing::debug!(status = %output.status(), "whoami failed");
            String::new()
        }
        Err(e) => {
            tracing::debug!(error = %e, "whoami failed");
            String::new()
        }
    };
    if user.is_empty() {
        return Err(DeployError::NamespaceUnresolved);
    }
    tracing::debug!(namespace = %user, "namespace taken from current user");
    Ok(Namespace::new(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::CommandOutput;
    use crate::test_fixtures::FakeRunner;

    fn config_with_namespace(ns: &str) -> DeployConfig {
        let mut config = DeployConfig::default();
        config.vars.insert("namespace".to_string(), ns.to_string());
        config
    }

    #[test]
    fn test_override_wins() {
        let runner = FakeRunner::new();
        let ns = resolve_namespace(Some("ci"), &config_with_namespace("dev"), &runner).unwrap();
        assert_eq!(ns.as_str(), "ci");
        assert!(runner.commands().is_empty());
    }

    #[test]
    fn test_vars_namespace_before_user() {
        let runner = FakeRunner::new();
        let ns = resolve_namespace(Some("  "), &config_with_namespace("dev"), &runner).unwrap();
        assert_eq!(ns.as_str(), "dev");
    }

    #[test]
    fn test_falls_back_to_whoami() {
        let runner = FakeRunner::new().respond("whoami", CommandOutput::ok("alice\n"));
        let ns = resolve_namespace(None, &DeployConfig::default(), &runner).unwrap();
        assert_eq!(ns.as_str(), "alice");
    }

    #[test]
    fn test_unresolved_when_everything_is_empty() {
        let runner = FakeRunner::new().respond("whoami", CommandOutput::ok(""));
        let err = resolve_namespace(None, &config_with_namespace(""), &runner).unwrap_err();
        assert!(matches!(err, DeployError::NamespaceUnresolved));
    }

    #[test]
    fn test_whoami_spawn_failure_is_unresolved() {
        let runner = FakeRunner::new().spawn_failure("whoami");
        let err = resolve_namespace(None, &DeployConfig::default(), &runner).unwrap_err();
        assert!(matches!(err, DeployError::NamespaceUnresolved));
    }

    #[test]
    fn test_reserved_namespaces() {
        assert!(Namespace::new("default").is_reserved());
        assert!(Namespace::new("").is_reserved());
        assert!(!Namespace::new("dev").is_reserved());
    }
}
