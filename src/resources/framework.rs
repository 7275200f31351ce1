//! Oh My Zsh installation resource.
use anyhow::{Context as _, Result};
use std::path::PathBuf;

use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::error::TaskError;
use crate::exec::Executor;

/// Upstream unattended installer.
pub const INSTALL_SCRIPT_URL: &str =
    "https://raw.githubusercontent.com/ohmyzsh/ohmyzsh/master/tools/install.sh";

/// The Oh My Zsh framework, installed into `dir` by its own install script.
#[derive(Debug)]
pub struct OhMyZshResource<'a> {
    /// Framework directory (`$ZSH`).
    pub dir: PathBuf,
    executor: &'a dyn Executor,
}

impl<'a> OhMyZshResource<'a> {
    /// Create a new framework resource.
    #[must_use]
    pub const fn new(dir: PathBuf, executor: &'a dyn Executor) -> Self {
        Self { dir, executor }
    }
}

impl Applicable for OhMyZshResource<'_> {
    fn description(&self) -> String {
        format!("oh-my-zsh in {}", self.dir.display())
    }

    /// Fetch the installer with `curl` and run it without touching the
    /// login shell, starting zsh, or replacing `~/.zshrc`.
    fn apply(&self) -> Result<ResourceChange> {
        if !self.executor.which("curl") {
            return Err(TaskError::MissingDependency("curl".to_string()).into());
        }

        let script = self
            .executor
            .run("curl", &["-fsSL", INSTALL_SCRIPT_URL])
            .context("downloading oh-my-zsh installer")?;

        let dir = self.dir.to_string_lossy().into_owned();
        self.executor
            .run_with_env(
                "sh",
                &["-c", &script.stdout, "install.sh", "--unattended"],
                &[
                    ("ZSH", dir.as_str()),
                    ("RUNZSH", "no"),
                    ("CHSH", "no"),
                    ("KEEP_ZSHRC", "yes"),
                ],
            )
            .context("running oh-my-zsh installer")?;

        Ok(ResourceChange::Applied)
    }
}

impl Resource for OhMyZshResource<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        if self.dir.is_dir() {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Missing)
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::error::ResourceError;
    use crate::resources::test_helpers::MockExecutor;

    #[test]
    fn correct_when_directory_exists() {
        let tmp = tempfile::tempdir().unwrap();
        let executor = MockExecutor::new();
        let resource = OhMyZshResource::new(tmp.path().to_path_buf(), &executor);
        assert_eq!(resource.current_state().unwrap(), ResourceState::Correct);
    }

    #[test]
    fn missing_when_directory_absent() {
        let tmp = tempfile::tempdir().unwrap();
        let executor = MockExecutor::new();
        let resource = OhMyZshResource::new(tmp.path().join(".oh-my-zsh"), &executor);
        assert_eq!(resource.current_state().unwrap(), ResourceState::Missing);
    }

    #[test]
    fn apply_without_curl_is_missing_dependency() {
        let tmp = tempfile::tempdir().unwrap();
        let executor = MockExecutor::new();
        let resource = OhMyZshResource::new(tmp.path().join(".oh-my-zsh"), &executor);

        let err = resource.apply().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TaskError>(),
            Some(TaskError::MissingDependency(tool)) if tool == "curl"
        ));
        assert!(executor.calls().is_empty(), "nothing may run without curl");
    }

    #[test]
    fn apply_downloads_then_runs_installer() {
        let tmp = tempfile::tempdir().unwrap();
        let executor = MockExecutor::new()
            .with_program("curl")
            .with_responses(vec![(true, "echo installing"), (true, "")]);
        let resource = OhMyZshResource::new(tmp.path().join(".oh-my-zsh"), &executor);

        assert_eq!(resource.apply().unwrap(), ResourceChange::Applied);

        let calls = executor.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], format!("curl -fsSL {INSTALL_SCRIPT_URL}"));
        assert_eq!(calls[1], "sh -c echo installing install.sh --unattended");
    }

    #[test]
    fn apply_propagates_download_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let executor = MockExecutor::new()
            .with_program("curl")
            .with_responses(vec![(false, "")]);
        let resource = OhMyZshResource::new(tmp.path().join(".oh-my-zsh"), &executor);

        let err = resource.apply().unwrap_err();
        assert!(
            err.chain()
                .any(|c| c.downcast_ref::<ResourceError>().is_some())
        );
        assert_eq!(executor.calls().len(), 1, "installer must not run");
    }
}
