//! Deployment orchestration
//!
//! A full run walks these phases in order, aborting on the first failure:
//!
//! ```text
//! PreClean -> ShareStorageReady -> DepsSynced -> NamespaceReady -> PerServiceLoop -> Complete
//! ```
//!
//! For every planned service not yet `Done`:
//! 1. look up its descriptor
//! 2. render its fragments into `<output>/<service>/`
//! 3. run its `apply.sh`, if any
//! 4. with sidecar injection disabled for skip-inject services, apply the
//!    config map alone, then the whole output directory
//!
//! There is no rollback; services already applied stay applied.

pub mod injection;
pub mod state;
pub mod teardown;

use std::path::{Path, PathBuf};

use crate::catalog::{Catalog, Fragment, PRE_APPLY_SCRIPT, ServiceDescriptor};
use crate::cluster::{Cluster, Namespace};
use crate::config::DeployConfig;
use crate::error::{DeployError, Result, fs as fs_error};
use crate::exec::CommandRunner;
use crate::render::Renderer;
use crate::resolver::DeploymentPlan;
use crate::ui::Reporter;
use crate::workspace::DeployWorkspace;

pub use injection::InjectionGuard;
pub use state::{RunMode, RunPhase, RunState, ServiceState};

/// Drives a deployment plan against one namespace
pub struct Orchestrator<'a> {
    config: &'a DeployConfig,
    workspace: &'a DeployWorkspace,
    catalog: &'a Catalog,
    runner: &'a dyn CommandRunner,
    reporter: &'a dyn Reporter,
    namespace: Option<Namespace>,
    phase: RunPhase,
    state: RunState,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        config: &'a DeployConfig,
        workspace: &'a DeployWorkspace,
        catalog: &'a Catalog,
        runner: &'a dyn CommandRunner,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self {
            config,
            workspace,
            catalog,
            runner,
            reporter,
            namespace: None,
            phase: RunPhase::Idle,
            state: RunState::default(),
        }
    }

    /// Target namespace; required for everything except generation
    #[must_use]
    pub fn with_namespace(mut self, namespace: Namespace) -> Self {
        self.namespace = Some(namespace);
        self
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    #[cfg(test)]
    pub fn service_state(&self, service: &str) -> ServiceState {
        self.state.get(service)
    }

    fn output_dir(&self) -> &Path {
        &self.config.output_path
    }

    fn renderer(&self) -> Renderer<'a> {
        let config = self.config;
        Renderer::new(&self.workspace.mesh_dir, &config.output_path, &config.vars)
    }

    fn cluster(&self) -> Result<Cluster<'a>> {
        let namespace = self
            .namespace
            .clone()
            .ok_or(DeployError::NamespaceUnresolved)?;
        Ok(Cluster::new(self.runner, self.reporter, namespace))
    }

    fn enter(&mut self, phase: RunPhase) {
        tracing::debug!(%phase, "entering phase");
        self.phase = phase;
    }

    /// Run the whole plan
    ///
    /// # Errors
    ///
    /// Any error aborts the run; the phase is left at `Aborted`.
    pub fn run(&mut self, plan: &DeploymentPlan, mode: RunMode) -> Result<()> {
        let result = self.run_phases(plan, mode);
        match &result {
            Ok(()) => {
                self.enter(RunPhase::Complete);
                self.reporter.plan_finished();
            }
            Err(e) => {
                tracing::debug!(phase = %self.phase, error = %e, "run aborted");
                self.enter(RunPhase::Aborted);
                self.reporter.plan_abandoned();
            }
        }
        result
    }

    fn run_phases(&mut self, plan: &DeploymentPlan, mode: RunMode) -> Result<()> {
        self.enter(RunPhase::PreClean);
        self.pre_clean()?;

        self.enter(RunPhase::ShareStorageReady);
        self.prepare_share_storage()?;

        self.enter(RunPhase::DepsSynced);
        self.sync_deps()?;

        let cluster = match mode {
            RunMode::Deploy => {
                self.enter(RunPhase::NamespaceReady);
                let cluster = self.cluster()?;
                cluster.ensure_namespace()?;
                Some(cluster)
            }
            RunMode::Generate => None,
        };

        self.enter(RunPhase::PerServiceLoop);
        self.reporter.plan_started(plan.len());
        for (index, service) in plan.iter().enumerate() {
            if self.state.is_done(service) {
                tracing::debug!(service, "already done, skipping");
                continue;
            }
            self.reporter.service_started(service, index + 1, plan.len());
            self.process(service, cluster.as_ref())?;
            self.reporter.service_finished(service);
        }
        Ok(())
    }

    /// Render and apply a single service
    ///
    /// Ensures the namespace first; no pre-clean or dependency sync.
    pub fn deploy_service(&mut self, service: &str) -> Result<()> {
        let cluster = self.cluster()?;
        cluster.ensure_namespace()?;
        self.process(service, Some(&cluster))?;
        self.reporter.service_finished(service);
        Ok(())
    }

    /// Delete the resources of a single service
    ///
    /// Renders the service so its manifests describe exactly what to delete;
    /// deletion itself is best effort.
    pub fn stop_service(&mut self, service: &str) -> Result<()> {
        let cluster = self.cluster()?;
        let descriptor = self.catalog.require(service)?;
        self.renderer().render_service(descriptor)?;

        let dir = self.output_dir().join(service);
        match cluster.delete_dir(service, &dir) {
            Ok(output) if output.success() => {
                self.reporter.success(&format!("stopped service {service}"));
            }
            Ok(output) => self.reporter.warn(&format!(
                "stopping service {service} failed ({})",
                output.status()
            )),
            Err(e) => self
                .reporter
                .error(&format!("stopping service {service} failed: {e}")),
        }
        self.state.set(service, ServiceState::Pending);
        Ok(())
    }

    /// Delete everything in the namespace
    pub fn teardown(&mut self) -> Result<()> {
        let cluster = self.cluster()?;
        teardown::teardown(&cluster, self.reporter);
        self.state.reset();
        Ok(())
    }

    fn process(&mut self, service: &str, cluster: Option<&Cluster<'a>>) -> Result<()> {
        let result = self.process_inner(service, cluster);
        if let Err(e) = &result {
            tracing::debug!(service, error = %e, "service failed");
            self.state.set(service, ServiceState::Failed);
        }
        result
    }

    fn process_inner(&mut self, service: &str, cluster: Option<&Cluster<'a>>) -> Result<()> {
        let catalog = self.catalog;
        let descriptor = catalog.require(service)?;

        self.state.set(service, ServiceState::Rendering);
        let manifests = self.renderer().render_service(descriptor)?;
        tracing::debug!(service, manifests = manifests.len(), "rendered service");

        let Some(cluster) = cluster else {
            self.state.set(service, ServiceState::Done);
            self.reporter
                .success(&format!("generated service {service}"));
            return Ok(());
        };

        self.state.set(service, ServiceState::Applying);
        self.run_pre_apply_script(descriptor)?;
        self.apply(cluster, descriptor)?;

        self.state.set(service, ServiceState::Done);
        self.reporter
            .success(&format!("finished deploying service {service}"));
        Ok(())
    }

    fn run_pre_apply_script(&self, descriptor: &ServiceDescriptor) -> Result<()> {
        if !descriptor.has_pre_apply_script() {
            return Ok(());
        }
        let name = descriptor.name();
        let command = format!("bash {PRE_APPLY_SCRIPT}");
        let output = self.runner.run(&command, &self.workspace.service_dir(name))?;
        self.reporter.command_finished(name, &command, &output);
        output.into_result(&command).map(|_| ())
    }

    /// Staged apply, bracketed by the injection toggle for skip-inject services
    fn apply(&self, cluster: &Cluster<'a>, descriptor: &ServiceDescriptor) -> Result<()> {
        let guard = if self.config.skips_injection(descriptor.name()) {
            Some(InjectionGuard::acquire(cluster)?)
        } else {
            None
        };

        let applied = self.staged_apply(cluster, descriptor);
        let restored = guard.map_or(Ok(()), InjectionGuard::release);
        match (applied, restored) {
            (Err(apply_err), Err(restore_err)) => {
                self.reporter.error(&format!(
                    "sidecar injection left disabled on namespace {}: {restore_err}",
                    cluster.namespace()
                ));
                Err(apply_err)
            }
            (applied, restored) => applied.and(restored),
        }
    }

    fn staged_apply(&self, cluster: &Cluster<'a>, descriptor: &ServiceDescriptor) -> Result<()> {
        let name = descriptor.name();
        let dir = self.output_dir().join(name);

        if descriptor.has(Fragment::ConfigMap) {
            cluster.apply_file(name, &dir, Fragment::ConfigMap.file_name())?;
        }
        if descriptor.fragments().next().is_none() {
            tracing::debug!(service = name, "no manifests to apply");
            return Ok(());
        }
        cluster.apply_dir(name, &dir)
    }

    /// Remove and recreate the output directory
    fn pre_clean(&self) -> Result<()> {
        let output = self.output_dir();
        if output.exists() {
            std::fs::remove_dir_all(output).map_err(|e| fs_error::write_failed(output, e))?;
        }
        std::fs::create_dir_all(output).map_err(|e| fs_error::write_failed(output, e))?;
        tracing::debug!(output = %output.display(), "output directory recreated");
        Ok(())
    }

    fn prepare_share_storage(&self) -> Result<()> {
        let path: &PathBuf = &self.config.share_storage_path;
        std::fs::create_dir_all(path).map_err(|e| DeployError::ShareStorageFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    fn sync_deps(&self) -> Result<()> {
        let command = &self.config.sync_command;
        let output = self
            .runner
            .run(command, &self.workspace.mesh_dir)
            .map_err(|e| DeployError::DepsSyncFailed {
                reason: e.to_string(),
            })?;
        self.reporter.command_finished("deps", command, &output);
        if !output.success() {
            return Err(DeployError::DepsSyncFailed {
                reason: format!("`{command}` {}: {}", output.status(), output.stderr.trim()),
            });
        }
        Ok(())
    }
}
