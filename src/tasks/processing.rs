//! Generic resource processing loop: check state, apply, collect stats.
use anyhow::Result;

use super::context::Context;
use crate::resources::{Resource, ResourceChange, ResourceState};

/// Result of a single task execution.
///
/// # Examples
///
/// ```
/// use dotfiles_setup::tasks::{TaskResult, TaskStats};
///
/// let ok = TaskResult::Ok(TaskStats { changed: 1, already_ok: 0, skipped: 0 });
/// let skipped = TaskResult::Skipped("scripts directory not found".into());
///
/// assert_eq!(ok.detail().as_deref(), Some("1 changed, 0 already ok"));
/// assert_eq!(skipped.detail().as_deref(), Some("scripts directory not found"));
/// ```
#[derive(Debug, Clone)]
pub enum TaskResult {
    /// Task completed; carries what it changed.
    Ok(TaskStats),
    /// Task was skipped (its source is absent).
    Skipped(String),
    /// Task ran in dry-run mode; carries what it would change.
    DryRun(TaskStats),
}

impl TaskResult {
    /// Text shown next to the task in the run summary.
    #[must_use]
    pub fn detail(&self) -> Option<String> {
        match self {
            Self::Ok(stats) => Some(stats.summary(false)),
            Self::DryRun(stats) => Some(stats.summary(true)),
            Self::Skipped(reason) => Some(reason.clone()),
        }
    }
}

/// Counters for batch tasks that process many items.
///
/// Provides consistent summary logging across all tasks.
///
/// # Examples
///
/// ```
/// use dotfiles_setup::tasks::TaskStats;
///
/// let mut stats = TaskStats::new();
/// stats.changed = 3;
/// stats.already_ok = 2;
///
/// assert_eq!(stats.summary(false), "3 changed, 2 already ok");
/// assert_eq!(stats.summary(true), "3 would change, 2 already ok");
/// ```
///
/// When items are skipped, the summary includes the count:
///
/// ```
/// use dotfiles_setup::tasks::TaskStats;
///
/// let stats = TaskStats { changed: 1, already_ok: 2, skipped: 3 };
/// assert_eq!(stats.summary(false), "1 changed, 2 already ok, 3 skipped");
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TaskStats {
    /// Number of items changed or applied.
    pub changed: u32,
    /// Number of items already in the correct state.
    pub already_ok: u32,
    /// Number of items skipped because they could not be applied.
    pub skipped: u32,
}

impl TaskStats {
    /// Create a new empty stats counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Format the summary string (e.g. "3 changed, 10 already ok, 1 skipped").
    #[must_use]
    pub fn summary(&self, dry_run: bool) -> String {
        let verb = if dry_run { "would change" } else { "changed" };
        if self.skipped > 0 {
            format!(
                "{} {verb}, {} already ok, {} skipped",
                self.changed, self.already_ok, self.skipped
            )
        } else {
            format!("{} {verb}, {} already ok", self.changed, self.already_ok)
        }
    }

    /// Log the summary and return the appropriate `TaskResult`.
    #[must_use]
    pub fn finish(self, ctx: &Context) -> TaskResult {
        ctx.log.info(&self.summary(ctx.dry_run));
        if ctx.dry_run {
            TaskResult::DryRun(self)
        } else {
            TaskResult::Ok(self)
        }
    }
}

impl std::ops::AddAssign for TaskStats {
    fn add_assign(&mut self, other: Self) {
        self.changed += other.changed;
        self.already_ok += other.already_ok;
        self.skipped += other.skipped;
    }
}

/// Check and apply every resource in order, returning the combined counts.
///
/// `verb` names the action in log lines ("install", "link", "stow").
///
/// # Errors
///
/// Returns the first error from a state check or an `apply()`; resources
/// after the failing one are not touched.
pub fn collect_stats<R: Resource>(
    ctx: &Context,
    resources: impl IntoIterator<Item = R>,
    verb: &str,
) -> Result<TaskStats> {
    let mut stats = TaskStats::new();
    for resource in resources {
        let current = resource.current_state()?;
        stats += process_single(ctx, &resource, current, verb)?;
    }
    Ok(stats)
}

/// Process resources by checking each one's current state and applying as
/// needed, then log the summary.
///
/// # Errors
///
/// Returns the first error from a state check or an `apply()`.
pub fn process_resources<R: Resource>(
    ctx: &Context,
    resources: impl IntoIterator<Item = R>,
    verb: &str,
) -> Result<TaskResult> {
    Ok(collect_stats(ctx, resources, verb)?.finish(ctx))
}

/// Process a single resource given its current state, returning a stats delta.
fn process_single<R: Resource>(
    ctx: &Context,
    resource: &R,
    resource_state: ResourceState,
    verb: &str,
) -> Result<TaskStats> {
    let desc = resource.description();
    let mut delta = TaskStats::new();
    match resource_state {
        ResourceState::Correct => {
            ctx.log.debug(&format!("ok: {desc}"));
            delta.already_ok += 1;
        }
        ResourceState::Invalid { reason } => {
            ctx.log.warn(&format!("skipping {desc}: {reason}"));
            delta.skipped += 1;
        }
        resource_state @ (ResourceState::Missing | ResourceState::Incorrect { .. }) => {
            if ctx.dry_run {
                let msg = if let ResourceState::Incorrect { ref current } = resource_state {
                    format!("would {verb} {desc} (currently {current})")
                } else {
                    format!("would {verb}: {desc}")
                };
                ctx.log.dry_run(&msg);
                delta.changed += 1;
                return Ok(delta);
            }
            delta += apply_resource(ctx, resource, verb)?;
        }
    }
    Ok(delta)
}

/// Apply a single resource change, returning a stats delta.
fn apply_resource<R: Resource>(ctx: &Context, resource: &R, verb: &str) -> Result<TaskStats> {
    let desc = resource.description();
    let mut delta = TaskStats::new();
    match resource.apply()? {
        ResourceChange::Applied => {
            ctx.log.debug(&format!("{verb}: {desc}"));
            delta.changed += 1;
        }
        ResourceChange::AlreadyCorrect => {
            delta.already_ok += 1;
        }
        ResourceChange::Skipped { reason } => {
            ctx.log.warn(&format!("failed to {verb} {desc}: {reason}"));
            delta.skipped += 1;
        }
    }
    Ok(delta)
}
