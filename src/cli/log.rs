use clap::Parser;

/// Default number of recent log lines shown before following
pub const DEFAULT_TAIL: u32 = 150;

/// Arguments for the log command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Follow a service's log:\n    meshctl log gateway\n\n\
                  Show the last 20 lines of the past five minutes:\n    meshctl log gateway --tail 20 --since 5m")]
pub struct LogArgs {
    /// Service whose container log to follow
    pub service: String,

    /// Lines of recent log to display
    #[arg(long, default_value_t = DEFAULT_TAIL)]
    pub tail: u32,

    /// Only return logs newer than a relative duration like 5s, 2m, or 3h
    #[arg(long)]
    pub since: Option<String>,
}
