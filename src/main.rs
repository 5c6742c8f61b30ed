use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use mac_bootstrap::cli::{Cli, Command};
use mac_bootstrap::commands;
use mac_bootstrap::logging::{Logger, init_subscriber};

fn main() -> Result<()> {
    let args = Cli::parse();

    if matches!(args.command, Command::Version) {
        commands::version::run();
        return Ok(());
    }

    let command = args.command.log_name();
    init_subscriber(args.verbose, command);
    let log = Arc::new(Logger::new(command));

    match &args.command {
        Command::Install(opts) => commands::install::run(&args.global, opts, &log),
        Command::Uninstall => commands::uninstall::run(&args.global, &log),
        Command::Version => Ok(()),
    }
}
