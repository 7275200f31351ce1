//! Tasks that make sure GNU Stow and Oh My Zsh are installed.
use anyhow::Result;

use super::{Context, Task, TaskResult, process_resources};
use crate::resources::framework::OhMyZshResource;
use crate::resources::package::PackageResource;
use crate::resources::{Resource as _, ResourceState};

/// Install GNU Stow with pacman when it is not on `PATH`.
#[derive(Debug)]
pub struct InstallStow;

impl Task for InstallStow {
    fn name(&self) -> &'static str {
        "Install GNU Stow"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let resource = PackageResource::new("stow", "stow", &*ctx.executor);
        if resource.current_state()? == ResourceState::Missing {
            ctx.log.debug("stow not found on PATH");
            ctx.platform.ensure_supported()?;
        }
        process_resources(ctx, [resource], "install")
    }
}

/// Install Oh My Zsh with its upstream script when the framework directory
/// is absent.
#[derive(Debug)]
pub struct InstallOhMyZsh;

impl Task for InstallOhMyZsh {
    fn name(&self) -> &'static str {
        "Install Oh My Zsh"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let resource = OhMyZshResource::new(ctx.layout.framework_dir.clone(), &*ctx.executor);
        if ctx.dry_run
            && resource.needs_change()?
            && !ctx.executor.which("curl")
        {
            ctx.log.warn("curl not found on PATH; the installer could not be fetched");
        }
        process_resources(ctx, [resource], "install")
    }
}
