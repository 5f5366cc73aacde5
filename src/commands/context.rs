//! Per-invocation context shared by commands
//!
//! Loading order: working directory, environment file choice (so a production
//! run without `--env` fails before anything else), workspace layout, then the
//! configuration itself.

use std::path::{Path, PathBuf};

use crate::catalog::{Catalog, FsFragmentLister};
use crate::cli::GlobalArgs;
use crate::cluster::{Namespace, resolve_namespace};
use crate::config::{ConfigSource, DeployConfig, RUN_ENV_VAR};
use crate::error::{Result, fs as fs_error};
use crate::exec::CommandRunner;
use crate::resolver::{DeploymentPlan, resolve};
use crate::ui::Reporter;
use crate::workspace::DeployWorkspace;

/// Workspace and configuration for one command
#[derive(Debug)]
pub struct RunContext {
    pub workspace: DeployWorkspace,
    pub config: DeployConfig,
    pub source: ConfigSource,
    namespace_override: Option<String>,
}

impl RunContext {
    /// Load the context described by the global options
    pub fn load(global: &GlobalArgs) -> Result<Self> {
        let run_env = std::env::var(RUN_ENV_VAR).ok();
        Self::load_with_run_env(global, run_env.as_deref())
    }

    fn load_with_run_env(global: &GlobalArgs, run_env: Option<&str>) -> Result<Self> {
        let workdir = resolve_workdir(global.workdir.as_deref())?;
        tracing::debug!(run_env = ?run_env, workdir = %workdir.display(), "loading context");

        let source = ConfigSource::resolve(global.env_file.as_deref(), run_env, &workdir)?;
        if source.is_default() {
            tracing::info!(env = %source.path().display(), "no --env given, using default");
        }

        let workspace = DeployWorkspace::open(&workdir)?;
        tracing::debug!(
            mesh = %workspace.mesh_dir.display(),
            deps = %workspace.deps_dir.display(),
            "opened workspace"
        );
        let config = DeployConfig::load(source.path(), &workspace.root)?;

        Ok(Self {
            workspace,
            config,
            source,
            namespace_override: global.namespace.clone(),
        })
    }

    /// Build the service catalog from `mesh/`
    pub fn catalog(&self, reporter: &dyn Reporter) -> Result<Catalog> {
        let catalog = Catalog::build(
            &self.config,
            &FsFragmentLister::new(&self.workspace.mesh_dir),
            reporter,
        )?;
        if catalog.is_empty() {
            reporter.warn(&format!(
                "no services declared in {}",
                self.source.path().display()
            ));
        }
        tracing::debug!(services = catalog.len(), "built catalog");
        Ok(catalog)
    }

    /// Resolve the deployment plan
    pub fn plan(&self) -> Result<DeploymentPlan> {
        resolve(&self.config)
    }

    /// Resolve the target namespace
    pub fn namespace(&self, runner: &dyn CommandRunner) -> Result<Namespace> {
        resolve_namespace(self.namespace_override.as_deref(), &self.config, runner)
    }
}

fn resolve_workdir(workdir: Option<&Path>) -> Result<PathBuf> {
    match workdir {
        Some(path) => Ok(path.to_path_buf()),
        None => std::env::current_dir()
            .map_err(|e| fs_error::io_error(format!("Failed to get current directory: {e}"))),
    }
}
