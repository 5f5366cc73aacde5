//! Configuration file handling for meshctl
//!
//! This module contains:
//! - [`DeployConfig`]: the environment file (`etc/test_env.yaml` and friends)
//! - [`Selector`]: enable/disable selectors inside that file
//! - [`source`]: which environment file a run loads, gated on `RUN_ENV`

pub mod deploy;
pub mod serialization;
pub mod source;

// Re-export commonly used types
pub use deploy::{DeployConfig, Selector};
pub use source::{ConfigSource, RUN_ENV_VAR};
