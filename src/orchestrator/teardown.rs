//! Namespace teardown

use crate::cluster::{Cluster, ResourceKind};
use crate::exec::CommandOutput;
use crate::ui::Reporter;

/// Delete every managed resource kind, then the namespace itself
///
/// Best effort: each failure is reported and the next step still runs. The
/// `default` namespace (or an empty name) is never deleted.
pub fn teardown(cluster: &Cluster<'_>, reporter: &dyn Reporter) {
    let ns = cluster.namespace();
    reporter.heading(&format!("Stopping all services in namespace {ns}"));

    for kind in ResourceKind::ALL {
        let what = format!("{kind} in namespace {ns}");
        report(reporter, &what, cluster.delete_all(kind));
    }

    if ns.is_reserved() {
        reporter.info(&format!("keeping namespace {ns}"));
        return;
    }
    report(
        reporter,
        &format!("namespace {ns}"),
        cluster.delete_namespace(),
    );
}

fn report(reporter: &dyn Reporter, what: &str, result: crate::error::Result<CommandOutput>) {
    match result {
        Ok(output) if output.success() => reporter.success(&format!("deleted {what}")),
        Ok(output) => reporter.warn(&format!("deleting {what} failed ({})", output.status())),
        Err(e) => reporter.error(&format!("deleting {what} failed: {e}")),
    }
}
