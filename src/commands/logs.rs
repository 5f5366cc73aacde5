//! log command

use crate::cli::{GlobalArgs, LogArgs};
use crate::cluster::{Cluster, LogOptions};
use crate::commands::context::RunContext;
use crate::error::{DeployError, Result};
use crate::exec::{CommandRunner, ShellRunner};
use crate::ui::{ConsoleReporter, Reporter};

/// Run log command
pub fn run(global: &GlobalArgs, args: LogArgs) -> Result<()> {
    let reporter = ConsoleReporter::new();
    let ctx = RunContext::load(global)?;
    let namespace = ctx.namespace(&ShellRunner)?;
    follow(&ShellRunner, &reporter, namespace, &args)
}

fn follow(
    runner: &dyn CommandRunner,
    reporter: &dyn Reporter,
    namespace: crate::cluster::Namespace,
    args: &LogArgs,
) -> Result<()> {
    let cluster = Cluster::new(runner, reporter, namespace);
    let pods = cluster.pods_for(&args.service)?;
    let Some(pod) = pods.first() else {
        return Err(DeployError::PodNotFound {
            service: args.service.clone(),
            namespace: cluster.namespace().to_string(),
        });
    };
    if pods.len() > 1 {
        tracing::debug!(pod = %pod, count = pods.len(), "several pods match, following the first");
    }

    let options = LogOptions {
        tail: args.tail,
        since: args.since.clone(),
    };
    let output = cluster.follow_logs(pod, &args.service, &options, &mut |line: &str| {
        if is_error_line(line) {
            reporter.error(line);
        } else {
            reporter.info(line);
        }
    })?;
    if !output.success() {
        reporter.warn(&format!("log stream for {pod} ended ({})", output.status()));
    }
    Ok(())
}

/// Lines mentioning an error are highlighted
fn is_error_line(line: &str) -> bool {
    line.to_ascii_lowercase().contains("error")
}
