//! status, pods, services and port commands

use crate::cli::{GlobalArgs, StatusArgs};
use crate::cluster::{Cluster, ResourceKind};
use crate::commands::context::RunContext;
use crate::error::Result;
use crate::exec::ShellRunner;
use crate::ui::{ConsoleReporter, Reporter};

/// Run status command
pub fn status(global: &GlobalArgs, args: StatusArgs) -> Result<()> {
    let kinds = match args.kind {
        Some(kind) => vec![kind],
        None => ResourceKind::ALL.to_vec(),
    };
    with_cluster(global, |cluster, reporter| show_kinds(cluster, reporter, &kinds))
}

/// Run pods command
pub fn pods(global: &GlobalArgs) -> Result<()> {
    with_cluster(global, |cluster, reporter| {
        show_kinds(cluster, reporter, &[ResourceKind::Pod])
    })
}

/// Run services command
pub fn services(global: &GlobalArgs) -> Result<()> {
    with_cluster(global, |cluster, reporter| {
        show_kinds(cluster, reporter, &[ResourceKind::Service])
    })
}

/// Run port command
pub fn port(global: &GlobalArgs) -> Result<()> {
    with_cluster(global, show_node_ports)
}

fn with_cluster(
    global: &GlobalArgs,
    f: impl FnOnce(&Cluster<'_>, &dyn Reporter) -> Result<()>,
) -> Result<()> {
    let reporter = ConsoleReporter::new();
    let runner = ShellRunner;
    let ctx = RunContext::load(global)?;
    let namespace = ctx.namespace(&runner)?;
    let cluster = Cluster::new(&runner, &reporter, namespace);
    f(&cluster, &reporter)
}

fn show_kinds(cluster: &Cluster<'_>, reporter: &dyn Reporter, kinds: &[ResourceKind]) -> Result<()> {
    let ns = cluster.namespace();
    for &kind in kinds {
        let output = cluster.get(kind)?;
        reporter.heading(&format!("{kind} in namespace {ns}:"));
        let stdout = output.stdout.trim_end();
        if stdout.is_empty() {
            reporter.info("  (none)");
        } else {
            reporter.info(stdout);
        }
        let stderr = output.stderr.trim_end();
        if !stderr.is_empty() {
            reporter.warn(stderr);
        }
    }
    Ok(())
}

fn show_node_ports(cluster: &Cluster<'_>, reporter: &dyn Reporter) -> Result<()> {
    let (header, rows) = cluster.node_ports()?;
    if rows.is_empty() {
        reporter.info(&format!(
            "No NodePort services in namespace {}",
            cluster.namespace()
        ));
        return Ok(());
    }
    reporter.heading(&header);
    for row in rows {
        reporter.info(&row);
    }
    Ok(())
}
