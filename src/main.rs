//! meshctl - service mesh deployer
//!
//! Renders per-service Kubernetes manifests from templates and applies them to
//! a namespace in a deterministic dependency order, toggling Istio sidecar
//! injection for services that must run without a sidecar.

use clap::Parser;
use miette::Diagnostic;
use tracing_subscriber::EnvFilter;

mod catalog;
mod cli;
mod cluster;
mod commands;
mod config;
mod error;
mod exec;
mod orchestrator;
mod render;
mod resolver;
mod ui;
mod workspace;

#[cfg(test)]
mod test_fixtures;

use cli::{Cli, Commands};
use error::{DeployError, EXIT_FAILURE};

fn init_tracing(verbose: bool) {
    let default = if verbose { "meshctl=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // A second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn report(e: &DeployError) {
    eprintln!("Error: {e}");
    if let Some(help) = e.help() {
        eprintln!("  help: {help}");
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { EXIT_FAILURE } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    init_tracing(cli.global.verbose);
    let global = cli.global;

    let result = match cli.command {
        Commands::Start(args) => commands::deploy::start(&global, args),
        Commands::Stop(args) => commands::stop::run(&global, args),
        Commands::Restart => commands::deploy::restart(&global),
        Commands::Reload(args) => commands::deploy::reload(&global, args),
        Commands::Gen => commands::deploy::generate(&global),
        Commands::Status(args) => commands::status::status(&global, args),
        Commands::Pods => commands::status::pods(&global),
        Commands::Services => commands::status::services(&global),
        Commands::Port => commands::status::port(&global),
        Commands::Log(args) => commands::logs::run(&global, args),
        Commands::Plan(args) => commands::plan::run(&global, args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        report(&e);
        std::process::exit(EXIT_FAILURE);
    }
}
