#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for `conf/install.toml` handling.
//!
//! These tests exercise `Config::load` and `Config::validate` against
//! isolated temporary repositories, and check that overridden settings
//! flow through a full install run.

mod common;

use std::sync::Arc;

use common::{FakeExecutor, TestEnvBuilder};
use dotfiles_setup::commands::install::install;
use dotfiles_setup::config::{Config, DEFAULT_MODULES};
use dotfiles_setup::error::ConfigError;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// A repository without `conf/install.toml` uses the built-in module list.
#[test]
fn repo_without_install_toml_uses_defaults() {
    let env = TestEnvBuilder::new().build();
    let config = Config::load(&env.root).unwrap();
    assert_eq!(config.settings.modules, DEFAULT_MODULES);
    assert!(config.validate().is_empty());
}

/// A syntax error is reported with the offending file.
#[test]
fn malformed_install_toml_is_rejected() {
    let env = TestEnvBuilder::new()
        .with_install_toml("modules = [\"zsh\"\n")
        .build();
    let err = Config::load(&env.root).unwrap_err();
    assert!(
        matches!(&err, ConfigError::InvalidSyntax { file, .. } if file.ends_with("install.toml")),
        "expected InvalidSyntax, got {err:?}"
    );
}

/// Suspicious but loadable settings produce warnings, not errors.
#[test]
fn questionable_settings_produce_warnings() {
    let env = TestEnvBuilder::new()
        .with_install_toml("modules = [\"zsh\", \"zsh\"]\nbin_dir = \"/opt/bin\"\n")
        .build();
    let config = Config::load(&env.root).unwrap();
    assert_eq!(config.validate().len(), 2);
}

// ---------------------------------------------------------------------------
// Settings applied during a run
// ---------------------------------------------------------------------------

/// Only the configured modules are stowed, in the configured order.
#[test]
fn configured_modules_are_stowed_in_order() {
    let env = TestEnvBuilder::new()
        .with_install_toml("modules = [\"tmux\", \"zsh\"]\n")
        .with_repo_custom()
        .with_framework()
        .with_module("zsh")
        .with_module("tmux")
        .with_module("git")
        .build();

    let executor = Arc::new(FakeExecutor::new());
    let (ctx, log) = env.context(Arc::clone(&executor));
    install(&ctx, &log).unwrap();

    let stow_calls = executor.calls_to("stow");
    assert_eq!(stow_calls.len(), 2);
    assert!(stow_calls[0].ends_with(" tmux"));
    assert!(stow_calls[1].ends_with(" zsh"));
    assert!(env.home_path(".gitrc").symlink_metadata().is_err());
}

/// Scripts and bin directories may be relocated.
#[test]
fn relocated_scripts_and_bin_dir() {
    let env = TestEnvBuilder::new()
        .with_install_toml("modules = []\nscripts = \"bin\"\nbin_dir = \"bin\"\n")
        .with_repo_custom()
        .with_framework()
        .with_repo_file("bin/tm", "#!/bin/sh\n")
        .build();

    let executor = Arc::new(FakeExecutor::new());
    let (ctx, log) = env.context(executor);
    install(&ctx, &log).unwrap();

    assert_eq!(
        std::fs::read_link(env.home_path("bin/tm")).unwrap(),
        env.root.join("bin/tm")
    );
    assert!(!env.home_path(".local/bin").exists());
}
