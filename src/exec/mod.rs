//! Command execution gateway
//!
//! Every shell and cluster command goes through [`CommandRunner`]. Calls are
//! synchronous: the caller blocks until the command exits. A non-zero exit is
//! not an error at this layer; callers decide whether it is fatal via
//! [`CommandOutput::into_result`] or tolerate it.

use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{Result, command as command_error};

/// Captured result of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code, `None` when terminated by a signal
    pub code: Option<i32>,
}

impl CommandOutput {
    /// Successful output with the given stdout
    #[cfg(test)]
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            code: Some(0),
        }
    }

    /// Failed output with the given exit code and stderr
    #[cfg(test)]
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: stderr.into(),
            code: Some(code),
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Human readable exit status
    pub fn status(&self) -> String {
        match self.code {
            Some(code) => format!("exit status: {code}"),
            None => "terminated by signal".to_string(),
        }
    }

    /// Turn a non-zero exit into [`DeployError::CommandFailed`](crate::error::DeployError::CommandFailed)
    pub fn into_result(self, command: &str) -> Result<Self> {
        if self.success() {
            Ok(self)
        } else {
            Err(command_error::failed(
                command,
                self.status(),
                self.stderr.trim_end(),
            ))
        }
    }
}

/// Synchronous command gateway
pub trait CommandRunner {
    /// Run `command` in `cwd` and capture its output
    ///
    /// Errors only when the command cannot be started at all.
    fn run(&self, command: &str, cwd: &Path) -> Result<CommandOutput>;

    /// Run `command`, handing each stdout line to `on_line` as it arrives
    fn stream(&self, command: &str, cwd: &Path, on_line: &mut dyn FnMut(&str)) -> Result<CommandOutput>;
}

/// Runs commands through `bash -c`
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellRunner;

impl ShellRunner {
    fn command(command: &str, cwd: &Path) -> Command {
        let mut cmd = Command::new("bash");
        cmd.arg("-c").arg(command);
        if !cwd.as_os_str().is_empty() {
            cmd.current_dir(cwd);
        }
        cmd
    }
}

impl CommandRunner for ShellRunner {
    fn run(&self, command: &str, cwd: &Path) -> Result<CommandOutput> {
        tracing::debug!(command, cwd = %cwd.display(), "executing");
        let output = Self::command(command, cwd)
            .output()
            .map_err(|e| command_error::spawn_failed(command, e))?;

        let result = CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            code: output.status.code(),
        };
        tracing::debug!(command, code = ?result.code, "finished");
        Ok(result)
    }

    fn stream(&self, command: &str, cwd: &Path, on_line: &mut dyn FnMut(&str)) -> Result<CommandOutput> {
        tracing::debug!(command, cwd = %cwd.display(), "streaming");
        let mut child = Self::command(command, cwd)
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| command_error::spawn_failed(command, e))?;

        if let Some(stdout) = child.stdout.take() {
            read_lines(BufReader::new(stdout), command, on_line);
        }

        let status = child
            .wait()
            .map_err(|e| command_error::spawn_failed(command, e))?;
        Ok(CommandOutput {
            stdout: String::new(),
            stderr: String::new(),
            code: status.code(),
        })
    }
}

/// Hand each line of `reader` to `on_line`, replacing invalid UTF-8
fn read_lines(mut reader: impl BufRead, command: &str, on_line: &mut dyn FnMut(&str)) {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {
                if buf.ends_with(b"\n") {
                    buf.pop();
                    if buf.ends_with(b"\r") {
                        buf.pop();
                    }
                }
                on_line(&String::from_utf8_lossy(&buf));
            }
            Err(e) => {
                tracing::debug!(command, error = %e, "stopped reading stream");
                break;
            }
        }
    }
}
