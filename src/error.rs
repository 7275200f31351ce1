//! Domain-specific error types for the dotfiles installer.
//!
//! This module provides a structured error hierarchy using [`thiserror`].
//! Internal modules return typed errors (e.g., [`ConfigError`], [`ResourceError`])
//! while the install command converts them to [`anyhow::Error`] via the
//! standard `?` operator. [`exit_code`] maps the final error chain back to a
//! process exit status.
//!
//! # Error hierarchy
//!
//! ```text
//! DotfilesError
//! ├── Config(ConfigError)    — install.toml parsing, path resolution
//! ├── Task(TaskError)        — missing prerequisite tools
//! ├── Resource(ResourceError)— backups, external commands
//! └── Platform(PlatformError)— unsupported distribution
//! ```

use thiserror::Error;

/// Top-level error type for the dotfiles installer.
///
/// Aggregates domain-specific sub-errors and is convertible to
/// [`anyhow::Error`] for use at the command boundary.
#[derive(Error, Debug)]
pub enum DotfilesError {
    /// Configuration-related error (parsing, path resolution, I/O).
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Task execution error (missing prerequisite tool).
    #[error("Task execution error: {0}")]
    Task(#[from] TaskError),

    /// Resource operation error (symlink, backup, external command).
    #[error("Resource error: {0}")]
    Resource(#[from] ResourceError),

    /// Platform-specific error (unsupported distribution).
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),
}

/// Errors that arise from configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The TOML file contains a syntax error or an unknown key.
    #[error("Invalid TOML in {file}: {message}")]
    InvalidSyntax {
        /// Path of the offending file.
        file: String,
        /// Parser diagnostic.
        message: String,
    },

    /// An I/O error occurred while reading a config file.
    #[error("IO error reading config file {path}: {source}")]
    Io {
        /// Path to the file that could not be read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A required environment variable is not set.
    #[error("{0} environment variable is not set")]
    MissingEnv(&'static str),
}

/// Errors that arise during task execution.
///
/// Most task failures are resource or command errors with added context;
/// this type covers conditions detected by the task itself.
#[derive(Error, Debug)]
pub enum TaskError {
    /// A tool required to continue is not on `PATH`.
    #[error("Required tool '{0}' not found on PATH")]
    MissingDependency(String),
}

/// Errors that arise from resource operations.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// Moving a path into the backup tree failed.
    #[error("Backup of {path} failed: {reason}")]
    Backup {
        /// Path that was being backed up.
        path: String,
        /// Rendered cause of the failure.
        reason: String,
    },

    /// An external command exited unsuccessfully.
    #[error("{program} failed (exit {}): {stderr}", .code.map_or_else(|| "signal".to_string(), |c| c.to_string()))]
    CommandFailed {
        /// Program (and context) that was run.
        program: String,
        /// Exit code, or `None` when terminated by a signal.
        code: Option<i32>,
        /// Trimmed standard error of the command.
        stderr: String,
    },
}

/// Errors that arise from platform detection.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// The current distribution has no supported package manager.
    #[error("Unsupported platform: {platform} (only Arch Linux is supported)")]
    Unsupported {
        /// Human-readable description of the detected platform.
        platform: String,
    },
}

/// Map an error chain to the process exit code.
///
/// Unsupported platforms and missing prerequisite tools exit with `1`.  A
/// failed external command propagates its own exit code.  Anything else
/// exits with `1`.
#[must_use]
pub fn exit_code(err: &anyhow::Error) -> u8 {
    for cause in err.chain() {
        if cause.downcast_ref::<PlatformError>().is_some() {
            return 1;
        }
        if let Some(TaskError::MissingDependency(_)) = cause.downcast_ref::<TaskError>() {
            return 1;
        }
        if let Some(ResourceError::CommandFailed { code: Some(code), .. }) =
            cause.downcast_ref::<ResourceError>()
            && let Some(code) = u8::try_from(*code).ok().filter(|c| *c != 0)
        {
            return code;
        }
    }
    1
}
