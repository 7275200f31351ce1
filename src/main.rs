//! `dotfiles-setup` binary entry point.
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use dotfiles_setup::logging::Log as _;
use dotfiles_setup::{cli, commands, error, logging};

fn main() -> ExitCode {
    let args = cli::Cli::parse();
    logging::init_subscriber(args.verbose, "install");
    let log = Arc::new(logging::Logger::new("install"));

    match commands::install::run(&args, &log) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log.error(&format!("{e:#}"));
            ExitCode::from(error::exit_code(&e))
        }
    }
}
