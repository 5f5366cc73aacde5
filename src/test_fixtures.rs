//! Test fixtures and fakes shared by unit tests.
//!
//! - temp directories and deploy workspaces on disk
//! - [`InMemoryLister`]: a `FragmentLister` without a filesystem
//! - [`FakeRunner`]: a scripted `CommandRunner` that records every command
//! - [`RecordingReporter`]: a `Reporter` that keeps every line
//!
//! # Usage
//!
//! ```ignore
//! let temp = create_deploy_root(&[("mesh/cache/dm.yaml", "kind: Deployment")]);
//! let runner = FakeRunner::new().respond("get namespace", CommandOutput::failed(1, ""));
//! ```

#![allow(clippy::expect_used)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::catalog::{FragmentLister, FragmentSet};
use crate::error::{DeployError, Result};
use crate::exec::{CommandOutput, CommandRunner};
use crate::ui::Reporter;

/// Create a temp directory in the system temp location.
///
/// A relative `TMPDIR` is ignored so fixtures never land inside the
/// working directory.
///
/// # Panics
///
/// Panics if the temp directory cannot be created.
#[must_use]
pub fn create_temp_dir() -> TempDir {
    TempDir::new_in(temp_dir_base()).expect("Failed to create temp directory")
}

fn temp_dir_base() -> PathBuf {
    let dir = std::env::temp_dir();
    if dir.is_absolute() {
        dir
    } else {
        PathBuf::from("/tmp")
    }
}

/// Create a deploy top directory with `mesh/`, `deps/` and the given files.
///
/// Paths are relative to the temp root.
///
/// # Panics
///
/// Panics if any directory or file cannot be created.
#[must_use]
pub fn create_deploy_root(files: &[(&str, &str)]) -> TempDir {
    let temp = create_temp_dir();
    std::fs::create_dir_all(temp.path().join("mesh")).expect("Failed to create mesh dir");
    std::fs::create_dir_all(temp.path().join("deps")).expect("Failed to create deps dir");
    create_test_files(&temp, files);
    temp
}

/// Create test files in a directory.
///
/// Takes a list of (path, content) tuples and creates those files.
///
/// # Panics
///
/// Panics if any file cannot be created.
pub fn create_test_files(temp: &TempDir, files: &[(&str, &str)]) {
    for (path, content) in files {
        let full_path = temp.path().join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&full_path, content).expect("Failed to write test file");
    }
}

/// Fragment lister backed by a map of service name to file names
#[derive(Debug, Default)]
pub struct InMemoryLister {
    services: HashMap<String, Vec<String>>,
}

impl InMemoryLister {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_service(mut self, name: &str, files: &[&str]) -> Self {
        self.services.insert(
            name.to_string(),
            files.iter().map(|f| (*f).to_string()).collect(),
        );
        self
    }
}

impl FragmentLister for InMemoryLister {
    fn list_fragments(&self, service: &str) -> Result<FragmentSet> {
        let files = self
            .services
            .get(service)
            .ok_or_else(|| DeployError::ServiceDirMissing {
                service: service.to_string(),
                path: format!("<memory>/{service}"),
            })?;
        Ok(FragmentSet::from_file_names(files.iter().map(String::as_str)))
    }
}

/// A command seen by [`FakeRunner`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCommand {
    pub command: String,
    pub cwd: PathBuf,
}

/// Scripted command runner
///
/// Responses are matched by substring in registration order; unmatched
/// commands succeed with empty output. Commands matching a `spawn_failure`
/// pattern fail to start.
#[derive(Debug, Default)]
pub struct FakeRunner {
    responses: Vec<(String, CommandOutput)>,
    spawn_failures: Vec<String>,
    recorded: RefCell<Vec<RecordedCommand>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn respond(mut self, pattern: &str, output: CommandOutput) -> Self {
        self.responses.push((pattern.to_string(), output));
        self
    }

    #[must_use]
    pub fn spawn_failure(mut self, pattern: &str) -> Self {
        self.spawn_failures.push(pattern.to_string());
        self
    }

    /// Every command line run so far, in order
    pub fn commands(&self) -> Vec<String> {
        self.recorded
            .borrow()
            .iter()
            .map(|r| r.command.clone())
            .collect()
    }

    pub fn recorded(&self) -> Vec<RecordedCommand> {
        self.recorded.borrow().clone()
    }

    /// Index of the first command containing `pattern`
    pub fn position(&self, pattern: &str) -> Option<usize> {
        self.commands().iter().position(|c| c.contains(pattern))
    }

    fn answer(&self, command: &str, cwd: &Path) -> Result<CommandOutput> {
        self.recorded.borrow_mut().push(RecordedCommand {
            command: command.to_string(),
            cwd: cwd.to_path_buf(),
        });
        if self.spawn_failures.iter().any(|p| command.contains(p)) {
            return Err(crate::error::command::spawn_failed(command, "scripted failure"));
        }
        Ok(self
            .responses
            .iter()
            .find(|(pattern, _)| command.contains(pattern))
            .map(|(_, output)| output.clone())
            .unwrap_or_else(|| CommandOutput::ok("")))
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, command: &str, cwd: &Path) -> Result<CommandOutput> {
        self.answer(command, cwd)
    }

    fn stream(
        &self,
        command: &str,
        cwd: &Path,
        on_line: &mut dyn FnMut(&str),
    ) -> Result<CommandOutput> {
        let output = self.answer(command, cwd)?;
        for line in output.stdout.lines() {
            on_line(line);
        }
        Ok(output)
    }
}

/// Reporter that records `(level, message)` pairs
#[derive(Debug, Default)]
pub struct RecordingReporter {
    lines: RefCell<Vec<(&'static str, String)>>,
}

impl RecordingReporter {
    pub fn lines(&self) -> Vec<(&'static str, String)> {
        self.lines.borrow().clone()
    }

    /// Whether a line at `level` contains `needle`
    pub fn contains(&self, level: &str, needle: &str) -> bool {
        self.lines
            .borrow()
            .iter()
            .any(|(l, m)| *l == level && m.contains(needle))
    }

    fn push(&self, level: &'static str, message: &str) {
        self.lines.borrow_mut().push((level, message.to_string()));
    }
}

impl Reporter for RecordingReporter {
    fn info(&self, message: &str) {
        self.push("info", message);
    }

    fn success(&self, message: &str) {
        self.push("success", message);
    }

    fn warn(&self, message: &str) {
        self.push("warn", message);
    }

    fn error(&self, message: &str) {
        self.push("error", message);
    }

    fn heading(&self, message: &str) {
        self.push("heading", message);
    }

    fn service_finished(&self, service: &str) {
        self.push("finished", service);
    }

    fn plan_abandoned(&self) {
        self.push("abandoned", "");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_deploy_root() {
        let temp = create_deploy_root(&[("mesh/cache/dm.yaml", "kind: Deployment")]);
        assert!(temp.path().join("mesh").is_dir());
        assert!(temp.path().join("deps").is_dir());
        assert!(temp.path().join("mesh/cache/dm.yaml").is_file());
    }

    #[test]
    fn test_fake_runner_matches_in_order() {
        let runner = FakeRunner::new()
            .respond("get namespace", CommandOutput::failed(1, "NotFound"))
            .respond("get", CommandOutput::ok("pods"));
        let cwd = Path::new("/");

        assert!(!runner.run("kubectl get namespace x", cwd).unwrap().success());
        assert_eq!(runner.run("kubectl get pods", cwd).unwrap().stdout, "pods");
        assert!(runner.run("kubectl apply -f .", cwd).unwrap().success());
        assert_eq!(runner.commands().len(), 3);
        assert_eq!(runner.position("apply"), Some(2));
    }
}
