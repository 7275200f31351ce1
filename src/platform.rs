//! Platform detection.
use std::fmt;
use std::path::Path;

use crate::error::PlatformError;

/// Detected operating system platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    /// Linux kernel.
    Linux,
    /// Anything else (macOS, BSD, Windows).
    Other,
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linux => write!(f, "linux"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Platform information for the current system.
#[derive(Debug, Clone)]
pub struct Platform {
    /// Operating system family.
    pub os: Os,
    /// Whether `/etc/arch-release` is present.
    pub is_arch: bool,
}

impl Platform {
    /// Detect the current platform.
    #[must_use]
    pub fn detect() -> Self {
        let os = if cfg!(target_os = "linux") {
            Os::Linux
        } else {
            Os::Other
        };
        Self {
            os,
            is_arch: os == Os::Linux && Path::new("/etc/arch-release").exists(),
        }
    }

    /// Create a platform with explicit values (for tests and overrides).
    #[must_use]
    pub const fn new(os: Os, is_arch: bool) -> Self {
        Self { os, is_arch }
    }

    /// Whether this is a Linux system.
    #[must_use]
    pub fn is_linux(&self) -> bool {
        self.os == Os::Linux
    }

    /// Whether packages can be installed with pacman.
    #[must_use]
    pub fn uses_pacman(&self) -> bool {
        self.is_linux() && self.is_arch
    }

    /// Fail unless the platform package manager is supported.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::Unsupported`] on anything other than Arch Linux.
    pub fn ensure_supported(&self) -> Result<(), PlatformError> {
        if self.uses_pacman() {
            return Ok(());
        }
        let platform = if self.is_linux() {
            format!("{} (non-Arch)", self.os)
        } else {
            self.os.to_string()
        };
        Err(PlatformError::Unsupported { platform })
    }
}
