//! Task outcome records and the [`Log`] sink used by tasks.

/// How a task ended, as reported in the run summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Finished; any needed change was made.
    Ok,
    /// Not applicable to this configuration (e.g. an empty module list).
    NotApplicable,
    /// Its source is absent (e.g. no `scripts/` directory).
    Skipped,
    /// Only reported what it would change.
    DryRun,
    /// Aborted the run.
    Failed,
}

impl TaskStatus {
    /// Summary order for the totals line.
    pub(super) const ALL: [Self; 5] = [
        Self::Ok,
        Self::DryRun,
        Self::Skipped,
        Self::NotApplicable,
        Self::Failed,
    ];

    /// Glyph and ANSI colour of the summary line.
    pub(super) const fn marker(self) -> (&'static str, &'static str) {
        match self {
            Self::Ok => ("✓", "\x1b[32m"),
            Self::NotApplicable => ("·", "\x1b[2m"),
            Self::Skipped => ("○", "\x1b[33m"),
            Self::DryRun => ("~", "\x1b[36m"),
            Self::Failed => ("✗", "\x1b[31m"),
        }
    }

    /// Word used in the totals line.
    pub(super) const fn label(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::NotApplicable => "not applicable",
            Self::Skipped => "skipped",
            Self::DryRun => "dry run",
            Self::Failed => "failed",
        }
    }
}

/// One task's line in the run summary.
#[derive(Debug, Clone)]
pub struct TaskEntry {
    /// Task name.
    pub name: String,
    /// How it ended.
    pub status: TaskStatus,
    /// Change counts, skip reason, or error text.
    pub message: Option<String>,
}

/// Where tasks send progress messages and outcomes.
///
/// [`Logger`](super::Logger) is the only production sink; it is held as
/// `Arc<dyn Log>` in the task context.
pub trait Log: Send + Sync {
    /// Section header, one per task.
    fn stage(&self, msg: &str);
    /// Progress message.
    fn info(&self, msg: &str);
    /// Detail shown only with `--verbose` (always kept in the log file).
    fn debug(&self, msg: &str);
    /// Problem that does not stop the run.
    fn warn(&self, msg: &str);
    /// Problem that stops the run.
    fn error(&self, msg: &str);
    /// Change that a dry run would have made.
    fn dry_run(&self, msg: &str);
    /// Remember a task's outcome for the summary.
    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>);
}
