//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - service: start, stop and reload arguments
//! - status: status arguments
//! - log: log arguments
//! - plan: plan arguments
//! - completions: completions arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod completions;
pub mod log;
pub mod plan;
pub mod service;
pub mod status;

pub use completions::CompletionsArgs;
pub use log::LogArgs;
pub use plan::PlanArgs;
pub use service::{ReloadArgs, StartArgs, StopArgs};
pub use status::StatusArgs;

/// meshctl - service mesh deployer
///
/// Render service manifests from templates and apply them to a namespace in
/// dependency order.
#[derive(Parser, Debug)]
#[command(
    name = "meshctl",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Deploy templated services onto a Kubernetes namespace with an Istio mesh",
    long_about = "meshctl renders each service's manifests (config map, workload, service, \
                  mesh routing) from templates under mesh/<service>/ and applies them in a \
                  deterministic dependency order, toggling sidecar injection where needed.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  meshctl start                     \x1b[90m# Deploy every selected service\x1b[0m\n   \
                  meshctl start cache               \x1b[90m# Deploy a single service\x1b[0m\n   \
                  meshctl gen                       \x1b[90m# Render manifests only\x1b[0m\n   \
                  meshctl plan                      \x1b[90m# Show the deployment order\x1b[0m\n   \
                  meshctl stop -y                   \x1b[90m# Tear down the namespace\x1b[0m\n   \
                  meshctl log gateway --tail 50     \x1b[90m# Follow a service's log\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options accepted by every command
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Environment file (defaults to etc/test_env.yaml; required when RUN_ENV=PROD)
    #[arg(long = "env", short = 'e', global = true, value_name = "FILE")]
    pub env_file: Option<PathBuf>,

    /// Deploy top directory (defaults to current directory)
    #[arg(long, short = 'w', global = true, env = "MESHCTL_WORKDIR")]
    pub workdir: Option<PathBuf>,

    /// Target namespace (overrides vars.namespace)
    #[arg(long, short = 'n', global = true, env = "MESH_NAMESPACE")]
    pub namespace: Option<String>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Deploy every selected service, or a single one
    Start(StartArgs),

    /// Tear down the namespace, or stop a single service
    Stop(StopArgs),

    /// Tear down the namespace and deploy again
    Restart,

    /// Stop and start a single service
    Reload(ReloadArgs),

    /// Render manifests without touching the cluster
    Gen,

    /// Show resources in the namespace
    #[command(visible_alias = "ps")]
    Status(StatusArgs),

    /// List pods
    #[command(visible_alias = "pod")]
    Pods,

    /// List services
    #[command(visible_aliases = ["service", "svc"])]
    Services,

    /// List NodePort services
    Port,

    /// Follow a service's container log
    #[command(visible_alias = "logs")]
    Log(LogArgs),

    /// Show the resolved deployment order
    Plan(PlanArgs),

    /// Show version information
    #[command(hide = true)]
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}
