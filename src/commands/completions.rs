//! Shell completions command

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::CompletionsArgs;
use crate::error::Result;

/// Generate shell completions
pub fn run(args: CompletionsArgs) -> Result<()> {
    write_completions(args.shell, &mut std::io::stdout().lock());
    Ok(())
}

fn write_completions(shell: Shell, out: &mut dyn std::io::Write) {
    let mut cmd = <crate::cli::Cli as CommandFactory>::command();
    clap_complete::generate(shell, &mut cmd, "meshctl", out);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generated(shell: Shell) -> String {
        let mut buf = Vec::new();
        write_completions(shell, &mut buf);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_completions_bash() {
        let script = generated(Shell::Bash);
        assert!(script.contains("meshctl"));
        assert!(script.contains("reload"));
    }

    #[test]
    fn test_completions_zsh() {
        assert!(generated(Shell::Zsh).contains("#compdef meshctl"));
    }

    #[test]
    fn test_completions_fish() {
        assert!(generated(Shell::Fish).contains("complete -c meshctl"));
    }

    #[test]
    fn test_completions_powershell_and_elvish() {
        assert!(!generated(Shell::PowerShell).is_empty());
        assert!(!generated(Shell::Elvish).is_empty());
    }
}
