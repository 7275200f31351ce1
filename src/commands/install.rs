//! The install command.
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};

use crate::cli::{Cli, VERSION};
use crate::config::Config;
use crate::exec::SystemExecutor;
use crate::logging::{Log, Logger};
use crate::platform::Platform;
use crate::tasks::{self, Context, Layout};

/// Run the install command.
///
/// # Errors
///
/// Returns an error if the repository root cannot be found, configuration
/// fails to load, `$HOME` is unset, or any task fails.
pub fn run(args: &Cli, log: &Arc<Logger>) -> Result<()> {
    log.info(&format!("dotfiles-setup {VERSION}"));
    let root = resolve_root(args)?;

    log.stage("Loading configuration");
    let config = Config::load(&root)?;
    log.info(&format!("root: {}", root.display()));
    log.debug(&format!(
        "modules: {}",
        config.settings.modules.join(", ")
    ));

    let warnings = config.validate();
    if !warnings.is_empty() {
        log.warn(&format!(
            "found {} configuration warning(s):",
            warnings.len()
        ));
        for warning in &warnings {
            log.warn(&format!("  [{}]: {}", warning.item, warning.message));
        }
    }

    let home = tasks::home_dir()?;
    let layout = Layout::from_env(&home, &config.settings);
    log.debug(&format!("layout: {layout:?}"));

    let ctx = Context::new(
        Arc::new(config),
        Arc::new(Platform::detect()),
        Arc::clone(log) as Arc<dyn Log>,
        args.dry_run,
        Arc::new(SystemExecutor),
        home,
        layout,
    );
    install(&ctx, log)
}

/// Run every install task against `ctx`, then print the completion notice.
///
/// # Errors
///
/// Returns the first task error.
pub fn install(ctx: &Context, log: &Logger) -> Result<()> {
    let all_tasks = tasks::all_install_tasks();
    super::run_tasks_to_completion(all_tasks.iter().map(AsRef::as_ref), ctx, log)?;

    for line in completion_notice(ctx, std::env::var_os("PATH").as_deref()) {
        log.info(&line);
    }
    Ok(())
}

/// Lines printed once every task has succeeded.
///
/// `path_var` is the value of `$PATH`, used to check that the bin
/// directory is reachable.
#[must_use]
pub fn completion_notice(ctx: &Context, path_var: Option<&OsStr>) -> Vec<String> {
    if ctx.dry_run {
        return vec!["dry run complete; no changes were made".to_string()];
    }

    let mut lines = vec![
        "installation complete".to_string(),
        "restart your shell or run `exec zsh` to load the new configuration".to_string(),
    ];

    if !ctx.backups.taken().is_empty() {
        lines.push(format!(
            "previous files were backed up to {}",
            ctx.backups.root().display()
        ));
    }

    let bin_dir = &ctx.layout.bin_dir;
    let on_path = path_var.is_some_and(|p| std::env::split_paths(p).any(|dir| dir == *bin_dir));
    if !on_path {
        lines.push(format!(
            "{} is not on PATH; add it in your shell profile: export PATH=\"{}:$PATH\"",
            bin_dir.display(),
            bin_dir.display()
        ));
    }
    lines
}

/// Resolve the dotfiles root directory from CLI arguments or auto-detection.
///
/// Order: `--root`, `DOTFILES_ROOT`, the directory holding the binary (or
/// the checkout it was built in), then the current directory.  A directory
/// qualifies when it holds `oh-my-zsh/` or `conf/`.  The result is always
/// absolute, since it ends up inside symlinks created elsewhere.
///
/// # Errors
///
/// Returns an error if an explicit root does not exist or no candidate looks
/// like a dotfiles checkout.
pub fn resolve_root(args: &Cli) -> Result<PathBuf> {
    if let Some(ref root) = args.root {
        return absolute_root(root);
    }

    if let Some(root) = std::env::var_os("DOTFILES_ROOT").filter(|v| !v.is_empty()) {
        return absolute_root(Path::new(&root));
    }

    if let Ok(exe) = std::env::current_exe()
        && let Some(parent) = exe.parent()
    {
        let candidates = [
            parent.join("../.."), // target/release/ → repo root
            parent.join(".."),    // bin/ → repo root
        ];
        for candidate in &candidates {
            if looks_like_root(candidate) {
                return std::fs::canonicalize(candidate)
                    .with_context(|| format!("resolving {}", candidate.display()));
            }
        }
    }

    let cwd = std::env::current_dir().context("reading current directory")?;
    if looks_like_root(&cwd) {
        return Ok(cwd);
    }

    anyhow::bail!("cannot determine dotfiles root. Use --root or set DOTFILES_ROOT env var");
}

fn absolute_root(root: &Path) -> Result<PathBuf> {
    std::fs::canonicalize(root)
        .with_context(|| format!("resolving dotfiles root {}", root.display()))
}

fn looks_like_root(dir: &Path) -> bool {
    dir.join("oh-my-zsh").is_dir() || dir.join("conf").is_dir()
}
