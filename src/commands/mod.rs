//! Top-level command orchestration.
pub mod install;

use anyhow::Result;

use crate::logging::Logger;
use crate::tasks::{self, Context, Task};

/// Execute tasks in order, stopping at the first failure, then print the
/// summary.
///
/// # Errors
///
/// Returns the first task error; later tasks are not run.
pub fn run_tasks_to_completion<'a>(
    tasks: impl IntoIterator<Item = &'a dyn Task>,
    ctx: &Context,
    log: &Logger,
) -> Result<()> {
    for task in tasks {
        if let Err(e) = tasks::execute(task, ctx) {
            log.print_summary(&ctx.backups.taken());
            return Err(e);
        }
    }

    log.print_summary(&ctx.backups.taken());
    Ok(())
}
