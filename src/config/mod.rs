//! Installer configuration: compiled-in defaults with an optional
//! `conf/install.toml` override in the repository root.
pub mod toml_loader;

use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Configuration modules stowed into the home directory, in order.
pub const DEFAULT_MODULES: &[&str] = &["zsh", "git", "nvim", "tmux", "kitty"];

/// Settings read from `conf/install.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Module directory names under the repository root.
    pub modules: Vec<String>,
    /// Scripts directory, relative to the repository root.
    pub scripts: String,
    /// Personal executable directory, relative to `$HOME`.
    pub bin_dir: String,
    /// Backup root, relative to `$HOME`.
    pub backup_dir: String,
    /// Source of the Oh My Zsh custom directory, relative to the repository root.
    pub framework_custom: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            modules: DEFAULT_MODULES.iter().map(ToString::to_string).collect(),
            scripts: "scripts".to_string(),
            bin_dir: ".local/bin".to_string(),
            backup_dir: ".dotfiles_backup".to_string(),
            framework_custom: "oh-my-zsh/custom".to_string(),
        }
    }
}

/// A configuration warning produced by [`Config::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// Offending item.
    pub item: String,
    /// What is wrong with it.
    pub message: String,
}

/// All loaded configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory of the dotfiles repository.
    pub root: PathBuf,
    /// Effective settings.
    pub settings: Settings,
}

impl Config {
    /// Build a config with default settings for `root`.
    #[must_use]
    pub fn with_defaults(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            settings: Settings::default(),
        }
    }

    /// Load configuration from `<root>/conf/install.toml`, falling back to
    /// defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let settings = toml_loader::load_config(&root.join("conf").join("install.toml"))?;
        Ok(Self {
            root: root.to_path_buf(),
            settings,
        })
    }

    /// Source directory of a configuration module.
    #[must_use]
    pub fn module_dir(&self, module: &str) -> PathBuf {
        self.root.join(module)
    }

    /// Directory whose files are published onto `PATH`.
    #[must_use]
    pub fn scripts_dir(&self) -> PathBuf {
        self.root.join(&self.settings.scripts)
    }

    /// Repository copy of the Oh My Zsh custom directory.
    #[must_use]
    pub fn framework_custom_source(&self) -> PathBuf {
        self.root.join(&self.settings.framework_custom)
    }

    /// Check settings for mistakes that would not stop a run.
    #[must_use]
    pub fn validate(&self) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        let mut seen = HashSet::new();
        for module in &self.settings.modules {
            if module.is_empty() || module.contains('/') || module == "." || module == ".." {
                warnings.push(ValidationWarning {
                    item: module.clone(),
                    message: "module must be a plain directory name".to_string(),
                });
            }
            if !seen.insert(module.as_str()) {
                warnings.push(ValidationWarning {
                    item: module.clone(),
                    message: "module listed more than once".to_string(),
                });
            }
        }
        if Path::new(&self.settings.bin_dir).is_absolute() {
            warnings.push(ValidationWarning {
                item: self.settings.bin_dir.clone(),
                message: "bin_dir is absolute; it is used as-is instead of under $HOME"
                    .to_string(),
            });
        }
        warnings
    }
}
