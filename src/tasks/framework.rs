//! Relinking of the Oh My Zsh custom directory.
use anyhow::Result;

use super::{Context, Task, TaskResult, process_resources};
use crate::resources::backup::BackupLinkResource;

/// Point the Oh My Zsh custom directory at the repository copy, backing up
/// whatever real directory was there before.
#[derive(Debug)]
pub struct LinkFrameworkCustom;

impl Task for LinkFrameworkCustom {
    fn name(&self) -> &'static str {
        "Link Oh My Zsh custom directory"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let source = ctx.config.framework_custom_source();
        if !source.is_dir() {
            ctx.log.warn(&format!(
                "custom directory not found in repository: {}",
                source.display()
            ));
            return Ok(TaskResult::Skipped(
                "custom directory not in repository".to_string(),
            ));
        }

        let resource =
            BackupLinkResource::new(source, ctx.layout.framework_custom.clone(), &ctx.backups);
        let result = process_resources(ctx, [resource], "link")?;
        for path in ctx.backups.taken() {
            ctx.log.info(&format!("backed up to {}", path.display()));
        }
        Ok(result)
    }
}
