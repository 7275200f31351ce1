use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{Config, Settings};
use crate::error::ConfigError;
use crate::exec::Executor;
use crate::logging::Log;
use crate::platform::Platform;
use crate::resources::backup::BackupLedger;

/// Resolved filesystem locations for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Oh My Zsh installation directory (`$ZSH`, default `~/.oh-my-zsh`).
    pub framework_dir: PathBuf,
    /// Oh My Zsh custom directory (`$ZSH_CUSTOM`, default `<framework_dir>/custom`).
    pub framework_custom: PathBuf,
    /// Personal executable directory.
    pub bin_dir: PathBuf,
    /// Timestamped backup directory for this run.
    pub backup_root: PathBuf,
}

impl Layout {
    /// Resolve the layout from explicit framework overrides.
    ///
    /// `timestamp` names the backup directory (`YYYYmmdd_HHMMSS`).
    #[must_use]
    pub fn resolve(
        home: &Path,
        settings: &Settings,
        zsh: Option<PathBuf>,
        zsh_custom: Option<PathBuf>,
        timestamp: &str,
    ) -> Self {
        let framework_dir = zsh.unwrap_or_else(|| home.join(".oh-my-zsh"));
        let framework_custom = zsh_custom.unwrap_or_else(|| framework_dir.join("custom"));
        Self {
            framework_dir,
            framework_custom,
            bin_dir: home.join(&settings.bin_dir),
            backup_root: home.join(&settings.backup_dir).join(timestamp),
        }
    }

    /// Resolve the layout from `ZSH` / `ZSH_CUSTOM` and the current time.
    #[must_use]
    pub fn from_env(home: &Path, settings: &Settings) -> Self {
        let var = |name: &str| {
            std::env::var_os(name)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        };
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
        Self::resolve(home, settings, var("ZSH"), var("ZSH_CUSTOM"), &timestamp)
    }
}

/// Return `$HOME`.
///
/// # Errors
///
/// Returns [`ConfigError::MissingEnv`] if `HOME` is unset or empty.
pub fn home_dir() -> Result<PathBuf, ConfigError> {
    std::env::var_os("HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .ok_or(ConfigError::MissingEnv("HOME"))
}

/// Shared context for task execution.
pub struct Context {
    /// Configuration for this run.
    pub config: Arc<Config>,
    /// Detected platform information.
    pub platform: Arc<Platform>,
    /// Logger for output and task recording.
    pub log: Arc<dyn Log>,
    /// Whether to perform a dry run (preview changes without applying).
    pub dry_run: bool,
    /// User's home directory path.
    pub home: PathBuf,
    /// Command executor (for testing or real system calls).
    pub executor: Arc<dyn Executor>,
    /// Resolved target paths.
    pub layout: Layout,
    /// Backups taken during this run.
    pub backups: Arc<BackupLedger>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("config", &self.config)
            .field("platform", &self.platform)
            .field("log", &"<dyn Log>")
            .field("dry_run", &self.dry_run)
            .field("home", &self.home)
            .field("executor", &"<dyn Executor>")
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

impl Context {
    /// Creates a new context for task execution.
    #[must_use]
    pub fn new(
        config: Arc<Config>,
        platform: Arc<Platform>,
        log: Arc<dyn Log>,
        dry_run: bool,
        executor: Arc<dyn Executor>,
        home: PathBuf,
        layout: Layout,
    ) -> Self {
        let backups = Arc::new(BackupLedger::new(layout.backup_root.clone(), home.clone()));
        Self {
            config,
            platform,
            log,
            dry_run,
            home,
            executor,
            layout,
            backups,
        }
    }

    /// Root directory of the dotfiles repository.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.config.root
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::tasks::test_helpers::make_context;

    #[test]
    fn layout_defaults_under_home() {
        let layout = Layout::resolve(
            Path::new("/home/me"),
            &Settings::default(),
            None,
            None,
            "20260101_000000",
        );
        assert_eq!(layout.framework_dir, PathBuf::from("/home/me/.oh-my-zsh"));
        assert_eq!(
            layout.framework_custom,
            PathBuf::from("/home/me/.oh-my-zsh/custom")
        );
        assert_eq!(layout.bin_dir, PathBuf::from("/home/me/.local/bin"));
        assert_eq!(
            layout.backup_root,
            PathBuf::from("/home/me/.dotfiles_backup/20260101_000000")
        );
    }

    #[test]
    fn layout_custom_follows_zsh_override() {
        let layout = Layout::resolve(
            Path::new("/home/me"),
            &Settings::default(),
            Some(PathBuf::from("/opt/omz")),
            None,
            "t",
        );
        assert_eq!(layout.framework_custom, PathBuf::from("/opt/omz/custom"));
    }

    #[test]
    fn layout_zsh_custom_override_wins() {
        let layout = Layout::resolve(
            Path::new("/home/me"),
            &Settings::default(),
            None,
            Some(PathBuf::from("/home/me/zsh-custom")),
            "t",
        );
        assert_eq!(layout.framework_dir, PathBuf::from("/home/me/.oh-my-zsh"));
        assert_eq!(layout.framework_custom, PathBuf::from("/home/me/zsh-custom"));
    }

    #[test]
    fn root_returns_config_root() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = make_context(tmp.path());
        assert_eq!(ctx.root(), tmp.path().join("repo"));
    }

    #[test]
    fn backup_ledger_uses_layout_root() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = make_context(tmp.path());
        assert_eq!(ctx.backups.root(), ctx.layout.backup_root);
    }

    #[test]
    fn debug_format_includes_key_fields() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = make_context(tmp.path());
        let debug = format!("{ctx:?}");
        assert!(debug.contains("Context"));
        assert!(debug.contains("dry_run"));
        assert!(debug.contains("layout"));
    }
}
