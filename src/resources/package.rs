//! Package installation resource.
use anyhow::Result;

use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::exec::Executor;

/// A system package installed through pacman.
///
/// Presence is judged by the package's command being on `PATH`, so a tool
/// installed by other means still counts as installed.
#[derive(Debug)]
pub struct PackageResource<'a> {
    /// Package name as known to pacman.
    pub name: String,
    /// Command the package provides.
    pub binary: String,
    /// Executor for running package manager commands.
    executor: &'a dyn Executor,
}

impl<'a> PackageResource<'a> {
    /// Create a new package resource.
    #[must_use]
    pub fn new(name: &str, binary: &str, executor: &'a dyn Executor) -> Self {
        Self {
            name: name.to_string(),
            binary: binary.to_string(),
            executor,
        }
    }
}

impl Applicable for PackageResource<'_> {
    fn description(&self) -> String {
        format!("{} (pacman)", self.name)
    }

    fn apply(&self) -> Result<ResourceChange> {
        self.executor.run(
            "sudo",
            &["pacman", "-S", "--needed", "--noconfirm", &self.name],
        )?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for PackageResource<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        if self.executor.which(&self.binary) {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Missing)
        }
    }
}
