//! Command-line interface definition.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI entry point for the link manager.
#[derive(Parser, Debug)]
#[command(
    name = "kitlink",
    about = "Link a configuration kit into your home directory, safely",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Preview changes without applying
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Override the kit root directory
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Override the home directory links are created in
    #[arg(long, global = true)]
    pub home: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Link every agent, skill, hook and config file into place
    Setup(SetupOpts),
    /// Move backed-up files back over their links
    Restore(RestoreOpts),
    /// Link individual command files
    Commands(CommandsOpts),
    /// Install a statusline script and point the settings at it
    Statusline(StatuslineOpts),
    /// List conflicts without changing anything
    Check,
    /// Print version information
    Version,
}

impl Command {
    /// Name used for the log file of this command.
    #[must_use]
    pub const fn log_name(&self) -> &'static str {
        match self {
            Self::Setup(_) => "setup",
            Self::Restore(_) => "restore",
            Self::Commands(_) => "commands",
            Self::Statusline(_) => "statusline",
            Self::Check => "check",
            Self::Version => "version",
        }
    }
}

/// Options for the `setup` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct SetupOpts {
    /// Back up occupying files and remove occupying directories
    #[arg(short, long)]
    pub force: bool,
}

/// Options for the `restore` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct RestoreOpts {
    /// Only restore these backups, by original or backup file name
    #[arg(long = "name", value_name = "NAME")]
    pub names: Vec<String>,

    /// Scan these directories instead of the configured ones
    #[arg(long = "dir", value_name = "DIR")]
    pub dirs: Vec<PathBuf>,
}

/// Options for the `commands` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct CommandsOpts {
    /// Command names to link (default: all)
    #[arg(value_name = "NAME")]
    pub names: Vec<String>,
}

/// Options for the `statusline` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct StatuslineOpts {
    /// Statusline to install (default: the first one found)
    #[arg(value_name = "NAME")]
    pub name: Option<String>,
}
