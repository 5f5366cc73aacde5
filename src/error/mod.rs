//! Error types and handling for meshctl
//!
//! Uses `thiserror` for error definitions and `miette` for diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`config`]: Configuration and workspace errors
//! - [`render`]: Template rendering and validation errors
//! - [`command`]: External command and cluster errors
//! - [`fs`]: File system errors
//!
//! Every variant is fatal for the run that produced it; the binary reports it
//! and exits with [`EXIT_FAILURE`].

pub mod command;
pub mod config;
pub mod fs;
pub mod render;


use miette::Diagnostic;
use thiserror::Error;

/// Exit status shared by every fatal path
pub const EXIT_FAILURE: i32 = 99;

/// Main error type for meshctl operations
#[derive(Error, Diagnostic, Debug)]
pub enum DeployError {
    // Configuration errors
    #[error("Configuration file not found: {path}")]
    #[diagnostic(
        code(meshctl::config::not_found),
        help("Pass the environment file with --env <FILE>")
    )]
    ConfigNotFound { path: String },

    #[error("Failed to read configuration file: {path}: {reason}")]
    #[diagnostic(code(meshctl::config::read_failed))]
    ConfigReadFailed { path: String, reason: String },

    #[error("Failed to parse configuration file: {path}: {reason}")]
    #[diagnostic(code(meshctl::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("RUN_ENV is {run_env}, an explicit environment file is required")]
    #[diagnostic(
        code(meshctl::config::path_required),
        help("Production runs never fall back to etc/test_env.yaml; pass --env <FILE>")
    )]
    ConfigPathRequired { run_env: String },

    #[error("Invalid deploy workspace at {path}: missing {missing}")]
    #[diagnostic(
        code(meshctl::config::workspace_invalid),
        help("Run meshctl from the deploy top directory (the one containing mesh/ and deps/)")
    )]
    WorkspaceInvalid { path: String, missing: String },

    // Catalog errors
    #[error("Service '{service}' directory not found: {path}")]
    #[diagnostic(
        code(meshctl::catalog::service_dir_missing),
        help("Every name in the `service` list needs a directory under mesh/")
    )]
    ServiceDirMissing { service: String, path: String },

    #[error("Service '{name}' not found in catalog")]
    #[diagnostic(code(meshctl::catalog::service_not_found))]
    ServiceNotFound { name: String },

    // Resolution errors
    #[error("Service '{name}' appears more than once in the deployment plan")]
    #[diagnostic(
        code(meshctl::resolve::duplicate_service),
        help("Check the `service`, `must_deps` and group lists for repeated entries")
    )]
    DuplicateService { name: String },

    // Render errors
    #[error("Template not found: {path}")]
    #[diagnostic(code(meshctl::render::template_not_found))]
    TemplateNotFound { path: String },

    #[error("Failed to parse template {path}: {reason}")]
    #[diagnostic(code(meshctl::render::parse_failed))]
    TemplateParse { path: String, reason: String },

    #[error("Failed to render template {path}: {reason}")]
    #[diagnostic(code(meshctl::render::render_failed))]
    RenderFailed { path: String, reason: String },

    #[error("Rendered {fragment} for service '{service}' still contains template syntax: {found}")]
    #[diagnostic(
        code(meshctl::render::validation_failed),
        help("Define the missing variable under `vars` or remove the directive from the template")
    )]
    ValidationFailed {
        service: String,
        fragment: String,
        found: String,
    },

    // Command errors
    #[error("Failed to start command `{command}`: {reason}")]
    #[diagnostic(code(meshctl::command::spawn_failed))]
    CommandSpawnFailed { command: String, reason: String },

    #[error("Command `{command}` failed ({status}): {stderr}")]
    #[diagnostic(code(meshctl::command::failed))]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("Dependency sync failed: {reason}")]
    #[diagnostic(code(meshctl::command::deps_sync_failed))]
    DepsSyncFailed { reason: String },

    #[error("Failed to prepare shared storage {path}: {reason}")]
    #[diagnostic(code(meshctl::command::share_storage_failed))]
    ShareStorageFailed { path: String, reason: String },

    // Namespace errors
    #[error("Could not determine target namespace")]
    #[diagnostic(
        code(meshctl::namespace::unresolved),
        help("Set vars.namespace, pass --namespace, or export MESH_NAMESPACE")
    )]
    NamespaceUnresolved,

    #[error("Failed to create namespace '{namespace}': {reason}")]
    #[diagnostic(code(meshctl::namespace::create_failed))]
    NamespaceCreateFailed { namespace: String, reason: String },

    #[error("No pods found for service '{service}' in namespace '{namespace}'")]
    #[diagnostic(code(meshctl::namespace::pod_not_found))]
    PodNotFound { service: String, namespace: String },

    // File system errors
    #[error("Failed to write file: {path}: {reason}")]
    #[diagnostic(code(meshctl::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(meshctl::fs::io_error))]
    IoError { message: String },
}

impl From<std::io::Error> for DeployError {
    fn from(err: std::io::Error) -> Self {
        DeployError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for DeployError {
    fn from(err: serde_yaml::Error) -> Self {
        DeployError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for DeployError {
    fn from(err: serde_json::Error) -> Self {
        DeployError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<inquire::InquireError> for DeployError {
    fn from(err: inquire::InquireError) -> Self {
        DeployError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, DeployError>;
