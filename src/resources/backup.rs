//! Backup-then-link resource and the per-run backup ledger.
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::helpers::fs::{ensure_parent_dir, move_path, remove_existing};
use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::error::ResourceError;

/// Per-run backup location plus the list of paths moved into it.
///
/// Paths are mirrored relative to `home`, so `~/.oh-my-zsh/custom` lands at
/// `<root>/.oh-my-zsh/custom`.  The root directory is only created when the
/// first backup is taken.
#[derive(Debug)]
pub struct BackupLedger {
    root: PathBuf,
    home: PathBuf,
    taken: Mutex<Vec<PathBuf>>,
}

impl BackupLedger {
    /// Create a ledger that will back up into `root`.
    #[must_use]
    pub const fn new(root: PathBuf, home: PathBuf) -> Self {
        Self {
            root,
            home,
            taken: Mutex::new(Vec::new()),
        }
    }

    /// Timestamped backup directory for this run.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where `path` would be placed inside the backup tree.
    #[must_use]
    pub fn destination_for(&self, path: &Path) -> PathBuf {
        let relative = path
            .strip_prefix(&self.home)
            .ok()
            .filter(|r| !r.as_os_str().is_empty())
            .map_or_else(
                || PathBuf::from(path.file_name().unwrap_or(path.as_os_str())),
                Path::to_path_buf,
            );
        self.root.join(relative)
    }

    /// Move `path` into the backup tree and record the destination.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Backup`] if the move fails.
    pub fn backup(&self, path: &Path) -> Result<PathBuf> {
        let dest = self.destination_for(path);
        move_path(path, &dest).map_err(|e| ResourceError::Backup {
            path: path.display().to_string(),
            reason: format!("{e:#}"),
        })?;
        if let Ok(mut guard) = self.taken.lock() {
            guard.push(dest.clone());
        }
        Ok(dest)
    }

    /// Destinations of every backup taken so far.
    #[must_use]
    pub fn taken(&self) -> Vec<PathBuf> {
        self.taken.lock().map_or_else(|_| vec![], |g| g.clone())
    }
}

/// Replace `target` with a symlink to `source`, backing up any real file or
/// directory that is in the way.
///
/// An existing symlink is simply replaced; only real content is moved into
/// the [`BackupLedger`].
#[derive(Debug)]
pub struct BackupLinkResource<'a> {
    /// What the link should point to.
    pub source: PathBuf,
    /// Where the link lives.
    pub target: PathBuf,
    ledger: &'a BackupLedger,
}

impl<'a> BackupLinkResource<'a> {
    /// Create a new backup-and-link resource.
    #[must_use]
    pub const fn new(source: PathBuf, target: PathBuf, ledger: &'a BackupLedger) -> Self {
        Self {
            source,
            target,
            ledger,
        }
    }
}

/// Metadata of `path` without following symlinks, or `None` if nothing is
/// there.  Any error other than not-found is returned.
fn existing_metadata(path: &Path) -> Result<Option<std::fs::Metadata>> {
    match path.symlink_metadata() {
        Ok(meta) => Ok(Some(meta)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("inspecting {}", path.display())),
    }
}

impl Applicable for BackupLinkResource<'_> {
    fn description(&self) -> String {
        format!("{} -> {}", self.target.display(), self.source.display())
    }

    fn apply(&self) -> Result<ResourceChange> {
        ensure_parent_dir(&self.target)?;
        match existing_metadata(&self.target)? {
            Some(meta) if meta.is_symlink() => remove_existing(&self.target)?,
            Some(_) => {
                self.ledger.backup(&self.target)?;
            }
            None => {}
        }
        std::os::unix::fs::symlink(&self.source, &self.target).with_context(|| {
            format!(
                "creating symlink {} -> {}",
                self.target.display(),
                self.source.display()
            )
        })?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for BackupLinkResource<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        if !self.source.is_dir() {
            return Ok(ResourceState::Invalid {
                reason: format!("source does not exist: {}", self.source.display()),
            });
        }

        let Some(meta) = existing_metadata(&self.target)? else {
            return Ok(ResourceState::Missing);
        };

        if meta.is_symlink() {
            let existing = std::fs::read_link(&self.target)
                .with_context(|| format!("reading link {}", self.target.display()))?;
            return if existing == self.source {
                Ok(ResourceState::Correct)
            } else {
                Ok(ResourceState::Incorrect {
                    current: format!("points to {}", existing.display()),
                })
            };
        }

        let kind = if meta.is_dir() { "directory" } else { "file" };
        Ok(ResourceState::Incorrect {
            current: format!("real {kind}, will be backed up"),
        })
    }
}
