//! Stowing of configuration modules into the home directory.
use anyhow::Result;

use super::{Context, Task, TaskResult, TaskStats, collect_stats};
use crate::resources::stow::StowModule;

/// Stow every configured module from the repository root into `$HOME`.
#[derive(Debug)]
pub struct StowModules;

impl Task for StowModules {
    fn name(&self) -> &'static str {
        "Stow configuration modules"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.config.settings.modules.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let mut stats = TaskStats::new();
        let mut modules = Vec::new();

        for name in &ctx.config.settings.modules {
            let dir = ctx.config.module_dir(name);
            if dir.is_dir() {
                modules.push(StowModule::new(
                    name,
                    ctx.root().to_path_buf(),
                    ctx.home.clone(),
                    &*ctx.executor,
                ));
            } else {
                ctx.log
                    .warn(&format!("module directory not found, skipping: {name}"));
                stats.skipped += 1;
            }
        }

        ctx.log
            .debug(&format!("{} modules to check", modules.len()));
        stats += collect_stats(ctx, modules, "stow")?;
        Ok(stats.finish(ctx))
    }
}
