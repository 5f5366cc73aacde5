use clap::Parser;

/// Arguments for the plan command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Show the deployment order:\n    meshctl plan\n\n\
                  Machine readable output:\n    meshctl plan --json")]
pub struct PlanArgs {
    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,
}
