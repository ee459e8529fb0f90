//! `kitlink` binary entry point.
use anyhow::Result;
use clap::Parser;

use kitlink_cli::{cli, commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();

    if matches!(args.command, cli::Command::Version) {
        commands::version::run();
        return Ok(());
    }

    let command = args.command.log_name();
    logging::init_subscriber(args.verbose, command);
    let log = logging::Logger::new(command);
    log.debug(&format!("kitlink {}", commands::version::version()));

    match &args.command {
        cli::Command::Setup(opts) => commands::setup::run(&args.global, opts, &log),
        cli::Command::Restore(opts) => commands::restore::run(&args.global, opts, &log),
        cli::Command::Commands(opts) => commands::install_commands::run(&args.global, opts, &log),
        cli::Command::Statusline(opts) => commands::statusline::run(&args.global, opts, &log),
        cli::Command::Check => commands::check::run(&args.global, &log),
        cli::Command::Version => Ok(()),
    }
}
