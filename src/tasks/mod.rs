//! Named tasks, run in a fixed order, that orchestrate resource changes.
mod context;
pub mod dependencies;
pub mod framework;
pub mod modules;
mod processing;
pub mod scripts;

pub use context::{Context, Layout, home_dir};
pub use processing::{TaskResult, TaskStats, collect_stats, process_resources};

use anyhow::Result;

use crate::logging::TaskStatus;

/// A named, executable task.
pub trait Task: Send + Sync {
    /// Human-readable task name.
    fn name(&self) -> &str;

    /// Whether this task applies to the current configuration.
    fn should_run(&self, ctx: &Context) -> bool;

    /// Execute the task.
    ///
    /// # Errors
    ///
    /// Returns an error if the task fails to execute, such as when system commands
    /// fail, file operations are not permitted, or a prerequisite is missing.
    fn run(&self, ctx: &Context) -> Result<TaskResult>;
}

/// The complete set of tasks run by the install command, in execution order.
#[must_use]
pub fn all_install_tasks() -> Vec<Box<dyn Task>> {
    vec![
        Box::new(dependencies::InstallStow),
        Box::new(dependencies::InstallOhMyZsh),
        Box::new(framework::LinkFrameworkCustom),
        Box::new(modules::StowModules),
        Box::new(scripts::PublishScripts),
    ]
}

/// Execute a task, recording the result in the logger.
///
/// # Errors
///
/// Returns the task's error after recording it as failed.
pub fn execute(task: &dyn Task, ctx: &Context) -> Result<()> {
    if !task.should_run(ctx) {
        ctx.log
            .debug(&format!("skipping task: {} (not applicable)", task.name()));
        ctx.log
            .record_task(task.name(), TaskStatus::NotApplicable, None);
        return Ok(());
    }

    ctx.log.stage(task.name());

    match task.run(ctx) {
        Ok(result) => {
            let status = match result {
                TaskResult::Ok(_) => TaskStatus::Ok,
                TaskResult::Skipped(ref reason) => {
                    ctx.log.info(&format!("skipped: {reason}"));
                    TaskStatus::Skipped
                }
                TaskResult::DryRun(_) => TaskStatus::DryRun,
            };
            ctx.log
                .record_task(task.name(), status, result.detail().as_deref());
        }
        Err(e) => {
            ctx.log
                .record_task(task.name(), TaskStatus::Failed, Some(&format!("{e:#}")));
            return Err(e.context(format!("{} failed", task.name())));
        }
    }
    Ok(())
}
