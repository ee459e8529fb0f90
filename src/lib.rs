//! Safe symlink installer for configuration kits.
//!
//! Links the agents, skills, hooks and config files of a kit directory into
//! a home directory, backing up or refusing to touch whatever already lives
//! at each target, and restores those backups on request.
//!
//! The public API is organised into four layers:
//!
//! - **[`config`]**: resolve the kit and home directories and load the link layout
//! - **[`resources`]**: classify targets, preview conflicts, install links, manage backups
//! - **[`report`]**: aggregate per-entry outcomes into a summary
//! - **[`commands`]**: top-level subcommand orchestration (`setup`, `restore`, `commands`, `check`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod report;
pub mod resources;
