use clap::Parser;

/// Arguments for the start command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Deploy every selected service:\n    meshctl start\n\n\
                  Deploy one service:\n    meshctl start cache")]
pub struct StartArgs {
    /// Service to deploy (if omitted, deploys the whole plan)
    pub service: Option<String>,
}

/// Arguments for the stop command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Tear down the namespace:\n    meshctl stop\n\n\
                  Tear down without confirmation:\n    meshctl stop -y\n\n\
                  Stop one service:\n    meshctl stop cache")]
pub struct StopArgs {
    /// Service to stop (if omitted, tears down the whole namespace)
    pub service: Option<String>,

    /// Skip confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Arguments for the reload command
#[derive(Parser, Debug)]
pub struct ReloadArgs {
    /// Service to stop and start again
    pub service: String,
}
