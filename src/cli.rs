//! Command-line argument definitions.
use clap::Parser;

/// Build version: `git describe` output when available, else the crate version.
pub const VERSION: &str = match option_env!("DOTFILES_SETUP_VERSION") {
    Some(version) => version,
    None => env!("CARGO_PKG_VERSION"),
};

/// Top-level CLI entry point for the dotfiles installer.
///
/// Running with no arguments performs a full install.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "dotfiles-setup",
    about = "Install the dotfiles collection into the home directory",
    version = VERSION
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Preview changes without applying
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    /// Override dotfiles root directory
    #[arg(long)]
    pub root: Option<std::path::PathBuf>,
}
