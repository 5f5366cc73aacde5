//! Resolve which environment file a run loads
//!
//! Outside production an omitted `--env` falls back to
//! `etc/test_env.yaml` under the deploy top directory. With `RUN_ENV=PROD`
//! there is no implicit default.

use std::path::{Path, PathBuf};

use crate::error::{DeployError, Result};

/// Environment variable carrying the execution mode
pub const RUN_ENV_VAR: &str = "RUN_ENV";

/// Execution mode value that requires an explicit environment file
pub const PROD_RUN_ENV: &str = "PROD";

/// Environment file used when none is given outside production
pub const DEFAULT_ENV_FILE: &str = "etc/test_env.yaml";

/// Where the environment file for this run came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Passed with `--env`
    Explicit(PathBuf),
    /// Fallback to [`DEFAULT_ENV_FILE`]
    Default(PathBuf),
}

impl ConfigSource {
    /// Pick the environment file for a run
    ///
    /// A relative explicit path is resolved against `workdir`.
    pub fn resolve(explicit: Option<&Path>, run_env: Option<&str>, workdir: &Path) -> Result<Self> {
        match explicit {
            Some(path) if path.is_absolute() => Ok(Self::Explicit(path.to_path_buf())),
            Some(path) => Ok(Self::Explicit(workdir.join(path))),
            None if run_env == Some(PROD_RUN_ENV) => Err(DeployError::ConfigPathRequired {
                run_env: PROD_RUN_ENV.to_string(),
            }),
            None => Ok(Self::Default(workdir.join(DEFAULT_ENV_FILE))),
        }
    }

    /// Path of the environment file
    pub fn path(&self) -> &Path {
        match self {
            Self::Explicit(path) | Self::Default(path) => path,
        }
    }

    /// True when the default file was substituted for a missing `--env`
    pub fn is_default(&self) -> bool {
        matches!(self, Self::Default(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_absolute_path_kept() {
        let source =
            ConfigSource::resolve(Some(Path::new("/etc/prod.yaml")), Some("PROD"), Path::new("/srv"))
                .unwrap();
        assert_eq!(source, ConfigSource::Explicit(PathBuf::from("/etc/prod.yaml")));
    }

    #[test]
    fn test_explicit_relative_path_joined_to_workdir() {
        let source =
            ConfigSource::resolve(Some(Path::new("etc/dev.yaml")), None, Path::new("/srv")).unwrap();
        assert_eq!(source.path(), Path::new("/srv/etc/dev.yaml"));
        assert!(!source.is_default());
    }

    #[test]
    fn test_default_outside_production() {
        let source = ConfigSource::resolve(None, Some("TEST"), Path::new("/srv")).unwrap();
        assert!(source.is_default());
        assert_eq!(source.path(), Path::new("/srv/etc/test_env.yaml"));
    }

    #[test]
    fn test_default_when_run_env_unset() {
        let source = ConfigSource::resolve(None, None, Path::new("/srv")).unwrap();
        assert!(source.is_default());
    }

    #[test]
    fn test_production_requires_explicit_path() {
        let err = ConfigSource::resolve(None, Some("PROD"), Path::new("/srv")).unwrap_err();
        assert!(matches!(err, DeployError::ConfigPathRequired { .. }));
    }
}
