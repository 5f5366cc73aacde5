//! stop command

use inquire::Confirm;

use crate::cli::{GlobalArgs, StopArgs};
use crate::cluster::{Cluster, Namespace};
use crate::commands::context::RunContext;
use crate::error::Result;
use crate::exec::{CommandRunner, ShellRunner};
use crate::orchestrator::Orchestrator;
use crate::orchestrator::teardown::teardown;
use crate::ui::{ConsoleReporter, Reporter};

/// Run stop command
///
/// Without a service the whole namespace is torn down, after confirmation
/// unless `-y` is given or nobody is attached to the terminal.
pub fn run(global: &GlobalArgs, args: StopArgs) -> Result<()> {
    let reporter = ConsoleReporter::new();
    let skip_prompt = args.yes || !console::user_attended();
    execute(global, &ShellRunner, &reporter, &args, |namespace| {
        if skip_prompt {
            Ok(true)
        } else {
            confirm_teardown(namespace)
        }
    })
}

fn confirm_teardown(namespace: &Namespace) -> Result<bool> {
    let keep = if namespace.is_reserved() {
        " (the namespace itself is kept)"
    } else {
        ""
    };
    let answer = Confirm::new(&format!(
        "Delete every managed resource in namespace {namespace}{keep}?"
    ))
    .with_default(false)
    .with_help_message("Type 'y' to confirm, or press Enter to cancel")
    .prompt()?;
    Ok(answer)
}

fn execute(
    global: &GlobalArgs,
    runner: &dyn CommandRunner,
    reporter: &dyn Reporter,
    args: &StopArgs,
    confirm: impl FnOnce(&Namespace) -> Result<bool>,
) -> Result<()> {
    let ctx = RunContext::load(global)?;
    let namespace = ctx.namespace(runner)?;

    match &args.service {
        Some(service) => {
            let catalog = ctx.catalog(reporter)?;
            Orchestrator::new(&ctx.config, &ctx.workspace, &catalog, runner, reporter)
                .with_namespace(namespace)
                .stop_service(service)
        }
        None => {
            if !confirm(&namespace)? {
                reporter.info("Stop cancelled.");
                return Ok(());
            }
            teardown(&Cluster::new(runner, reporter, namespace), reporter);
            Ok(())
        }
    }
}
