//! Structured logger with dry-run awareness and summary collection.
use std::path::PathBuf;
use std::sync::Mutex;

use super::utils::log_file_path;
use super::{DRY_RUN_TARGET, OUTCOME_TARGET, STAGE_TARGET, SUMMARY_TARGET};
use crate::report::Summary;
use crate::resources::LinkOutcome;

/// Structured logger with dry-run awareness and summary collection.
///
/// Messages go through [`tracing`]; when [`init_subscriber`](super::init_subscriber)
/// has been called they are also written to
/// `$XDG_CACHE_HOME/kitlink/<command>.log` (default `~/.cache/kitlink/<command>.log`)
/// with timestamps, regardless of the verbose flag.
#[derive(Debug)]
pub struct Logger {
    outcomes: Mutex<Vec<LinkOutcome>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a new logger for `command`.
    ///
    /// Stores the log file path for display in the run summary. The file
    /// itself is created by [`init_subscriber`](super::init_subscriber); this
    /// constructor does not write to it.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self {
            outcomes: Mutex::new(Vec::new()),
            log_file: log_file_path(command),
        }
    }

    /// Create a logger with no associated log file.
    #[must_use]
    pub const fn detached() -> Self {
        Self {
            outcomes: Mutex::new(Vec::new()),
            log_file: None,
        }
    }

    /// Return the log file path, if available.
    #[must_use]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose; always
    /// written to the log file).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a dry-run action message.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN_TARGET, "{msg}");
    }

    /// Record an outcome for the summary.
    ///
    /// Failures are logged as errors straight away; everything else only at
    /// debug level, since the summary lists it later.
    pub fn record(&self, outcome: &LinkOutcome) {
        let entry = outcome.name.as_str();
        let status = outcome.status.as_str();
        if outcome.is_failed() {
            tracing::error!(target: OUTCOME_TARGET, entry, status, "{}", outcome.message);
        } else {
            tracing::debug!(target: OUTCOME_TARGET, entry, status, "{}", outcome.message);
        }
        if let Ok(mut guard) = self.outcomes.lock() {
            guard.push(outcome.clone());
        }
    }

    /// Return a copy of every recorded outcome, in recording order.
    #[must_use]
    pub fn outcomes(&self) -> Vec<LinkOutcome> {
        self.outcomes.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Aggregate counts over the recorded outcomes.
    #[must_use]
    pub fn summary(&self) -> Summary {
        self.outcomes
            .lock()
            .map_or_else(|_| Summary::default(), |g| Summary::from_outcomes(g.iter()))
    }

    /// Return `true` if any recorded outcome has failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failure_count() > 0
    }

    /// Count the number of failed outcomes.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.summary().failed
    }

    /// Print every recorded outcome followed by the count line.
    pub fn print_summary(&self) {
        let outcomes = self.outcomes();
        if outcomes.is_empty() {
            return;
        }

        println!();
        self.stage("Summary");

        for outcome in &outcomes {
            tracing::info!(
                target: SUMMARY_TARGET,
                entry = outcome.name.as_str(),
                status = outcome.status.as_str(),
                "{}",
                outcome.message
            );
        }

        println!();
        tracing::info!(target: SUMMARY_TARGET, "{}", Summary::from_outcomes(&outcomes));

        if let Some(path) = &self.log_file {
            self.info(&format!("log: {}", path.display()));
        }
    }
}
