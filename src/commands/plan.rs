//! plan command

use std::fmt::Write as _;

use serde::Serialize;

use crate::catalog::{Catalog, Fragment, PRE_APPLY_SCRIPT};
use crate::cli::{GlobalArgs, PlanArgs};
use crate::commands::context::RunContext;
use crate::config::DeployConfig;
use crate::error::Result;
use crate::resolver::DeploymentPlan;
use crate::ui::ConsoleReporter;

/// One service of the resolved plan
#[derive(Debug, Serialize, PartialEq, Eq)]
struct PlanEntry<'a> {
    position: usize,
    service: &'a str,
    fragments: Vec<&'static str>,
    pre_apply_script: bool,
    skip_inject: bool,
}

/// Run plan command
pub fn run(global: &GlobalArgs, args: PlanArgs) -> Result<()> {
    let ctx = RunContext::load(global)?;
    let plan = ctx.plan()?;
    let catalog = ctx.catalog(&ConsoleReporter::new())?;
    let entries = entries(&plan, &catalog, &ctx.config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        print!("{}", render_text(&entries));
    }
    Ok(())
}

fn entries<'a>(
    plan: &'a DeploymentPlan,
    catalog: &Catalog,
    config: &DeployConfig,
) -> Result<Vec<PlanEntry<'a>>> {
    plan.iter()
        .enumerate()
        .map(|(index, service)| -> Result<PlanEntry<'a>> {
            let descriptor = catalog.require(service)?;
            Ok(PlanEntry {
                position: index + 1,
                service,
                fragments: descriptor.fragments().map(Fragment::file_name).collect(),
                pre_apply_script: descriptor.has_pre_apply_script(),
                skip_inject: config.skips_injection(service),
            })
        })
        .collect()
}

fn render_text(entries: &[PlanEntry<'_>]) -> String {
    if entries.is_empty() {
        return "No services selected\n".to_string();
    }
    let width = entries.iter().map(|e| e.service.len()).max().unwrap_or(0);
    let mut out = String::new();
    for entry in entries {
        let _ = write!(
            out,
            "{:>3}. {:<width$}  {}",
            entry.position,
            entry.service,
            entry.fragments.join(", ")
        );
        if entry.pre_apply_script {
            let _ = write!(out, " +{PRE_APPLY_SCRIPT}");
        }
        if entry.skip_inject {
            out.push_str(" [no sidecar]");
        }
        out.push('\n');
    }
    out
}
