//! Publishing of helper scripts onto `PATH`.
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

use super::{Context, Task, TaskResult, process_resources};
use crate::resources::symlink::SymlinkResource;

/// Regular files directly inside `dir`, sorted by name.
fn script_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in
        std::fs::read_dir(dir).with_context(|| format!("reading directory {}", dir.display()))?
    {
        let path = entry
            .with_context(|| format!("reading entry in {}", dir.display()))?
            .path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Link every file in the repository's scripts directory into the personal
/// bin directory.
///
/// Links whose script was removed from the repository are left behind.
#[derive(Debug)]
pub struct PublishScripts;

impl Task for PublishScripts {
    fn name(&self) -> &'static str {
        "Publish scripts"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let bin_dir = &ctx.layout.bin_dir;
        if ctx.dry_run {
            if !bin_dir.is_dir() {
                ctx.log
                    .dry_run(&format!("would create {}", bin_dir.display()));
            }
        } else {
            std::fs::create_dir_all(bin_dir)
                .with_context(|| format!("creating {}", bin_dir.display()))?;
        }

        let dir = ctx.config.scripts_dir();
        if !dir.is_dir() {
            ctx.log
                .warn(&format!("scripts directory not found: {}", dir.display()));
            return Ok(TaskResult::Skipped("scripts directory not found".to_string()));
        }

        let resources = script_files(&dir)?.into_iter().filter_map(|source| {
            let name = source.file_name()?.to_owned();
            Some(SymlinkResource::new(source, bin_dir.join(name)))
        });
        process_resources(ctx, resources, "link")
    }
}
