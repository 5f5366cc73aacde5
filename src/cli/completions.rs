use clap::Parser;
use clap_complete::Shell;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    meshctl completions bash > ~/.bash_completion.d/meshctl\n\n\
                  Generate zsh completions:\n    meshctl completions zsh > ~/.zfunc/_meshctl\n\n\
                  Generate fish completions:\n    meshctl completions fish > ~/.config/fish/completions/meshctl.fish")]
pub struct CompletionsArgs {
    /// Shell type
    #[arg(value_enum, ignore_case = true)]
    pub shell: Shell,
}
