use clap::Parser;

use crate::cluster::ResourceKind;

/// Arguments for the status command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Show every managed resource kind:\n    meshctl status\n\n\
                  Show virtual services only:\n    meshctl status vs")]
pub struct StatusArgs {
    /// Resource kind to show (if omitted, shows every managed kind)
    #[arg(value_enum)]
    pub kind: Option<ResourceKind>,
}
