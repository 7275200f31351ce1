//! Symlink resource.
use anyhow::{Context as _, Result};
use std::path::PathBuf;

use super::helpers::fs::{ensure_parent_dir, remove_existing};
use super::{Applicable, Resource, ResourceChange, ResourceState};

/// A symlink resource that can be checked and applied.
///
/// Applying replaces whatever file or symlink currently sits at `target`.
/// A real directory at `target` is never touched.
#[derive(Debug, Clone)]
pub struct SymlinkResource {
    /// The source file/directory (what the symlink points to).
    pub source: PathBuf,
    /// The target path (where the symlink will be created).
    pub target: PathBuf,
}

impl SymlinkResource {
    /// Create a new symlink resource.
    #[must_use]
    pub const fn new(source: PathBuf, target: PathBuf) -> Self {
        Self { source, target }
    }
}

impl Applicable for SymlinkResource {
    fn description(&self) -> String {
        format!("{} -> {}", self.target.display(), self.source.display())
    }

    fn apply(&self) -> Result<ResourceChange> {
        ensure_parent_dir(&self.target)?;
        remove_existing(&self.target)?;
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

impl Resource for SymlinkResource {
    fn current_state(&self) -> Result<ResourceState> {
        if !self.source.exists() {
            return Ok(ResourceState::Invalid {
                reason: format!("source does not exist: {}", self.source.display()),
            });
        }

        let Ok(meta) = self.target.symlink_metadata() else {
            return Ok(ResourceState::Missing);
        };

        if meta.is_dir() {
            return Ok(ResourceState::Invalid {
                reason: "target is a real directory".to_string(),
            });
        }

        if !meta.is_symlink() {
            return Ok(ResourceState::Incorrect {
                current: "target is a regular file".to_string(),
            });
        }

        let existing = std::fs::read_link(&self.target)
            .with_context(|| format!("reading link {}", self.target.display()))?;
        if existing == self.source {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Incorrect {
                current: format!("points to {}", existing.display()),
            })
        }
    }
}
