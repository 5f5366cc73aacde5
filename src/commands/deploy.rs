//! start, restart, reload and gen commands

use crate::cli::{GlobalArgs, ReloadArgs, StartArgs};
use crate::commands::context::RunContext;
use crate::error::Result;
use crate::exec::{CommandRunner, ShellRunner};
use crate::orchestrator::{Orchestrator, RunMode};
use crate::ui::{ConsoleReporter, Reporter};

/// What a deploy-family command does once the plan is resolved
#[derive(Debug, Clone, PartialEq, Eq)]
enum DeployAction {
    StartAll,
    StartOne(String),
    Restart,
    Reload(String),
    Generate,
}

impl DeployAction {
    fn needs_namespace(&self) -> bool {
        !matches!(self, DeployAction::Generate)
    }
}

/// Run start command
pub fn start(global: &GlobalArgs, args: StartArgs) -> Result<()> {
    let action = match args.service {
        Some(service) => DeployAction::StartOne(service),
        None => DeployAction::StartAll,
    };
    run(global, action)
}

/// Run restart command
pub fn restart(global: &GlobalArgs) -> Result<()> {
    run(global, DeployAction::Restart)
}

/// Run reload command
pub fn reload(global: &GlobalArgs, args: ReloadArgs) -> Result<()> {
    run(global, DeployAction::Reload(args.service))
}

/// Run gen command
pub fn generate(global: &GlobalArgs) -> Result<()> {
    run(global, DeployAction::Generate)
}

fn run(global: &GlobalArgs, action: DeployAction) -> Result<()> {
    let reporter = ConsoleReporter::new();
    execute(global, &ShellRunner, &reporter, action)
}

fn execute(
    global: &GlobalArgs,
    runner: &dyn CommandRunner,
    reporter: &dyn Reporter,
    action: DeployAction,
) -> Result<()> {
    let ctx = RunContext::load(global)?;
    let plan = ctx.plan()?;
    if plan.is_empty() {
        reporter.warn("No services selected");
    }
    let catalog = ctx.catalog(reporter)?;

    let mut orchestrator = Orchestrator::new(&ctx.config, &ctx.workspace, &catalog, runner, reporter);
    if action.needs_namespace() {
        let namespace = ctx.namespace(runner)?;
        reporter.info(&format!("Namespace: {namespace}"));
        orchestrator = orchestrator.with_namespace(namespace);
    }

    match action {
        DeployAction::StartAll => {
            orchestrator.run(&plan, RunMode::Deploy)?;
            reporter.success(&format!("Deployed {} service(s)", plan.len()));
        }
        DeployAction::StartOne(service) => {
            orchestrator.deploy_service(&service)?;
        }
        DeployAction::Restart => {
            orchestrator.teardown()?;
            orchestrator.run(&plan, RunMode::Deploy)?;
            reporter.success(&format!("Restarted {} service(s)", plan.len()));
        }
        DeployAction::Reload(service) => {
            orchestrator.stop_service(&service)?;
            orchestrator.deploy_service(&service)?;
        }
        DeployAction::Generate => {
            orchestrator.run(&plan, RunMode::Generate)?;
            reporter.success(&format!(
                "Generated manifests for {} service(s) in {}",
                plan.len(),
                ctx.config.output_path.display()
            ));
        }
    }
    tracing::debug!(phase = %orchestrator.phase(), "deploy command finished");
    Ok(())
}
