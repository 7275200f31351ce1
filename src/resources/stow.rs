//! GNU Stow module resource.
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::exec::Executor;

/// Entries stow ignores by default (its built-in ignore list).
///
/// `README*`, `LICENSE*` and `COPYING` are anchored to the package root;
/// below it stow links them like any other file.
fn is_ignored(name: &str, top_level: bool) -> bool {
    let anywhere = matches!(
        name,
        ".git" | ".gitignore" | ".gitmodules" | ".cvsignore" | "CVS" | "RCS" | ".svn" | "_darcs"
            | ".hg"
    ) || (name.len() > 1 && name.ends_with('~'))
        || (name.len() > 2 && name.ends_with(",v"))
        || (name.len() > 1 && name.starts_with('#') && name.ends_with('#'))
        || (name.starts_with(".#") && name.len() > 2);
    anywhere
        || (top_level
            && (name == "COPYING" || name.starts_with("README") || name.starts_with("LICENSE")))
}

/// One stow package (a directory under the repository root) linked into
/// the home directory.
#[derive(Debug)]
pub struct StowModule<'a> {
    /// Module name, also the package directory name.
    pub name: String,
    /// Stow directory (the repository root).
    pub stow_dir: PathBuf,
    /// Target directory (home).
    pub target: PathBuf,
    executor: &'a dyn Executor,
}

/// Outcome of comparing a package tree against the target tree.
#[derive(Debug, Default)]
struct LinkTally {
    missing: usize,
    conflicts: Vec<PathBuf>,
}

impl<'a> StowModule<'a> {
    /// Create a new stow module resource.
    #[must_use]
    pub fn new(name: &str, stow_dir: PathBuf, target: PathBuf, executor: &'a dyn Executor) -> Self {
        Self {
            name: name.to_string(),
            stow_dir,
            target,
            executor,
        }
    }

    /// Package directory for this module.
    #[must_use]
    pub fn package_dir(&self) -> PathBuf {
        self.stow_dir.join(&self.name)
    }

    fn stow(&self, mode: Option<&str>) -> Result<crate::exec::ExecResult> {
        let dir = self.stow_dir.to_string_lossy().into_owned();
        let target = self.target.to_string_lossy().into_owned();
        let mut args: Vec<&str> = mode.into_iter().collect();
        args.extend([
            "-d",
            dir.as_str(),
            "-t",
            target.as_str(),
            self.name.as_str(),
        ]);
        self.executor.run_unchecked("stow", &args)
    }
}

/// Walk `src`, checking that every non-ignored entry is reachable from the
/// mirrored path under `dst`.  A directory symlink that resolves into the
/// package (a folded tree) covers everything beneath it.  `top_level` is set
/// only for the package root.
fn tally_tree(src: &Path, dst: &Path, top_level: bool, tally: &mut LinkTally) -> Result<()> {
    let mut entries = std::fs::read_dir(src)
        .with_context(|| format!("reading directory {}", src.display()))?
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("reading entry in {}", src.display()))?;
    entries.sort_by_key(std::fs::DirEntry::file_name);

    for entry in entries {
        let name = entry.file_name();
        if is_ignored(&name.to_string_lossy(), top_level) {
            continue;
        }
        let src_path = entry.path();
        let dst_path = dst.join(&name);

        if dst_path.symlink_metadata().is_err() {
            tally.missing += 1;
            continue;
        }

        match (
            std::fs::canonicalize(&src_path),
            std::fs::canonicalize(&dst_path),
        ) {
            (Ok(a), Ok(b)) if a == b => {}
            (_, Err(_)) => tally.missing += 1,
            _ => {
                let unfolded = src_path.is_dir()
                    && dst_path
                        .symlink_metadata()
                        .is_ok_and(|m| m.is_dir() && !m.is_symlink());
                if unfolded {
                    tally_tree(&src_path, &dst_path, false, tally)?;
                } else {
                    tally.conflicts.push(dst_path);
                }
            }
        }
    }
    Ok(())
}

impl Applicable for StowModule<'_> {
    fn description(&self) -> String {
        format!("stow {}", self.name)
    }

    /// Adopt first; on conflict delete the module's farm and restow it.
    ///
    /// The adopt and delete invocations are allowed to fail. The final
    /// restow is not: its failure aborts the run.
    fn apply(&self) -> Result<ResourceChange> {
        let adopt = self.stow(Some("--adopt"))?;
        if adopt.success {
            return Ok(ResourceChange::Applied);
        }

        tracing::debug!(
            "stow --adopt {} conflicted, relinking: {}",
            self.name,
            adopt.stderr.trim()
        );
        let delete = self.stow(Some("-D"))?;
        if !delete.success {
            tracing::debug!("stow -D {} failed: {}", self.name, delete.stderr.trim());
        }

        let restow = self.stow(None)?;
        if !restow.success {
            return Err(crate::error::ResourceError::CommandFailed {
                program: format!("stow {}", self.name),
                code: restow.code,
                stderr: restow.stderr.trim().to_string(),
            }
            .into());
        }
        Ok(ResourceChange::Applied)
    }
}

impl Resource for StowModule<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        let package = self.package_dir();
        if !package.is_dir() {
            return Ok(ResourceState::Invalid {
                reason: format!("module directory not found: {}", package.display()),
            });
        }

        let mut tally = LinkTally::default();
        tally_tree(&package, &self.target, true, &mut tally)?;

        if !tally.conflicts.is_empty() {
            let listed = tally
                .conflicts
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            return Ok(ResourceState::Incorrect {
                current: format!("conflicting: {listed}"),
            });
        }
        if tally.missing > 0 {
            return Ok(ResourceState::Missing);
        }
        Ok(ResourceState::Correct)
    }
}
