//! User-facing reporting layer
//!
//! This module handles:
//! - Styled status lines for every stage of a run
//! - A progress bar over the deployment plan using indicatif
//!
//! Components never print directly; they receive a `&dyn Reporter` so the
//! console implementation can be swapped for a recording one in tests.
//! Diagnostic detail (exact command lines, working directories) goes to
//! `tracing` instead.

use std::cell::RefCell;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::exec::CommandOutput;

/// Reporting interface injected into catalog, orchestrator and commands
pub trait Reporter {
    /// Plain informational line
    fn info(&self, message: &str);

    /// A stage or service completed
    fn success(&self, message: &str);

    /// Something unexpected that does not stop the run
    fn warn(&self, message: &str);

    /// A failure, fatal or tolerated
    fn error(&self, message: &str);

    /// Section heading (status tables, teardown banner)
    fn heading(&self, message: &str);

    /// Report output of a finished command on behalf of `scope`
    fn command_finished(&self, scope: &str, command: &str, output: &CommandOutput) {
        let stdout = output.stdout.trim_end();
        if !stdout.is_empty() {
            self.info(&format!("{scope}: {command}\n{stdout}"));
        }
        let stderr = output.stderr.trim_end();
        if !stderr.is_empty() {
            self.warn(&format!("{scope}: {command} stderr: {stderr}"));
        }
    }

    /// A deployment plan of `total` services is about to run
    fn plan_started(&self, _total: usize) {}

    /// Service `current` of `total` entered rendering
    fn service_started(&self, _service: &str, _current: usize, _total: usize) {}

    /// Service finished successfully
    fn service_finished(&self, _service: &str) {}

    /// Every planned service finished
    fn plan_finished(&self) {}

    /// The run aborted part way through the plan
    fn plan_abandoned(&self) {}
}

/// Console reporter with colored output and a plan progress bar
///
/// The progress bar is only drawn when stdout is a terminal; lines printed
/// while it is visible are written around it.
pub struct ConsoleReporter {
    progress: RefCell<Option<ProgressBar>>,
    show_progress: bool,
}

impl ConsoleReporter {
    /// Create a console reporter, enabling the progress bar on terminals
    pub fn new() -> Self {
        Self {
            progress: RefCell::new(None),
            show_progress: console::Term::stdout().is_term(),
        }
    }

    fn emit(&self, line: &str) {
        match self.progress.borrow().as_ref() {
            Some(pb) => pb.suspend(|| println!("{line}")),
            None => println!("{line}"),
        }
    }

    fn emit_err(&self, line: &str) {
        match self.progress.borrow().as_ref() {
            Some(pb) => pb.suspend(|| eprintln!("{line}")),
            None => eprintln!("{line}"),
        }
    }

    fn take_progress(&self) -> Option<ProgressBar> {
        self.progress.borrow_mut().take()
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConsoleReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleReporter")
            .field("show_progress", &self.show_progress)
            .finish_non_exhaustive()
    }
}

impl Reporter for ConsoleReporter {
    fn info(&self, message: &str) {
        self.emit(message);
    }

    fn success(&self, message: &str) {
        self.emit(&Style::new().green().bold().apply_to(message).to_string());
    }

    fn warn(&self, message: &str) {
        self.emit(&Style::new().yellow().apply_to(message).to_string());
    }

    fn error(&self, message: &str) {
        self.emit_err(&Style::new().red().bold().apply_to(message).to_string());
    }

    fn heading(&self, message: &str) {
        self.emit(
            &Style::new()
                .yellow()
                .underlined()
                .apply_to(message)
                .to_string(),
        );
    }

    fn plan_started(&self, total: usize) {
        if !self.show_progress {
            return;
        }
        let style = ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        let pb = ProgressBar::new(total as u64);
        pb.set_style(style);
        *self.progress.borrow_mut() = Some(pb);
    }

    fn service_started(&self, service: &str, current: usize, total: usize) {
        if let Some(pb) = self.progress.borrow().as_ref() {
            pb.set_message(format!("({current}/{total}) {service}"));
        }
    }

    fn service_finished(&self, _service: &str) {
        if let Some(pb) = self.progress.borrow().as_ref() {
            pb.inc(1);
        }
    }

    fn plan_finished(&self) {
        if let Some(pb) = self.take_progress() {
            pb.finish_and_clear();
        }
    }

    fn plan_abandoned(&self) {
        if let Some(pb) = self.take_progress() {
            pb.abandon();
        }
    }
}
