//! The installer's [`Log`] sink and its end-of-run summary.
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::subscriber::{DRY_RUN_TARGET, STAGE_TARGET};
use super::types::{Log, TaskEntry, TaskStatus};
use super::utils::log_file_path;

const RESET: &str = "\x1b[0m";
const DIM: &str = "\x1b[2m";

/// Emits messages as [`tracing`] events and remembers each task's outcome.
#[derive(Debug)]
pub struct Logger {
    entries: Mutex<Vec<TaskEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a logger for `command`; the summary points at its log file.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            log_file: log_file_path(command),
        }
    }

    /// Outcomes recorded so far, in execution order.
    #[must_use]
    pub fn task_entries(&self) -> Vec<TaskEntry> {
        self.entries.lock().map_or_else(|_| Vec::new(), |e| e.clone())
    }

    /// Number of tasks recorded as failed.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.task_entries()
            .iter()
            .filter(|e| e.status == TaskStatus::Failed)
            .count()
    }

    /// Print the run summary, listing `backups` (paths moved aside this run).
    pub fn print_summary(&self, backups: &[PathBuf]) {
        let lines = summary_lines(&self.task_entries(), backups, self.log_file.as_deref());
        if lines.is_empty() {
            return;
        }
        self.stage("Summary");
        for line in &lines {
            self.info(line);
        }
    }
}

/// Summary body: one line per task with its change counts, a totals line,
/// each backup taken, then the log file.
fn summary_lines(entries: &[TaskEntry], backups: &[PathBuf], log_file: Option<&Path>) -> Vec<String> {
    if entries.is_empty() {
        return Vec::new();
    }

    let mut lines: Vec<String> = entries
        .iter()
        .map(|entry| {
            let (glyph, colour) = entry.status.marker();
            let detail = entry
                .message
                .as_deref()
                .map_or_else(String::new, |m| format!(" ({m})"));
            format!("{colour}{glyph} {}{detail}{RESET}", entry.name)
        })
        .collect();

    let totals: Vec<String> = TaskStatus::ALL
        .iter()
        .filter_map(|status| {
            let n = entries.iter().filter(|e| e.status == *status).count();
            (n > 0).then(|| format!("{n} {}", status.label()))
        })
        .collect();
    let noun = if entries.len() == 1 { "task" } else { "tasks" };
    lines.push(format!("{} {noun}: {}", entries.len(), totals.join(", ")));

    lines.extend(
        backups
            .iter()
            .map(|path| format!("backed up: {}", path.display())),
    );
    if let Some(path) = log_file {
        lines.push(format!("{DIM}log: {}{RESET}", path.display()));
    }
    lines
}

impl Log for Logger {
    fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN_TARGET, "{msg}");
    }

    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(TaskEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }
}
