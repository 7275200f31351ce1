//! Dotfiles installer.
//!
//! Installs a personal dotfiles collection on Arch Linux: makes sure GNU Stow
//! and Oh My Zsh are present, backs up and relinks the Oh My Zsh custom
//! directory, stows a fixed list of configuration modules into `$HOME`, and
//! publishes helper scripts into `~/.local/bin`.
//!
//! The public API is organised into four layers:
//!
//! - **[`config`]** — defaults and the optional `conf/install.toml` override
//! - **[`resources`]** — idempotent `check + apply` primitives (symlinks, packages, …)
//! - **[`tasks`]** — named, ordered units of work wired to resources
//! - **[`commands`]** — top-level orchestration of the install run
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod platform;
pub mod resources;
pub mod tasks;
