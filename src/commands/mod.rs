//! Subcommand orchestration.
pub mod check;
pub mod install_commands;
pub mod restore;
pub mod setup;
pub mod statusline;
pub mod version;

use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::config::Paths;
use crate::config::layout::Layout;
use crate::logging::Logger;

/// Resolved directories and layout shared by the link commands.
#[derive(Debug)]
pub struct CommandSetup {
    /// Kit root and home directory.
    pub paths: Paths,
    /// What to link.
    pub layout: Layout,
}

impl CommandSetup {
    /// Resolve the kit root and home directory and load the layout.
    ///
    /// # Errors
    ///
    /// Returns an error if either directory cannot be determined or
    /// `links.toml` fails to parse.
    pub fn init(global: &GlobalOpts, log: &Logger) -> Result<Self> {
        let paths = Paths::resolve(global.root.as_deref(), global.home.as_deref())?;
        log.debug(&format!("kit root: {}", paths.root.display()));
        log.debug(&format!("home: {}", paths.home.display()));

        log.stage("Loading layout");
        let layout = Layout::load(&paths.root)?;
        log.info(&format!(
            "{} group(s), {} file(s)",
            layout.groups.len(),
            layout.files.len()
        ));

        Ok(Self { paths, layout })
    }
}

/// Print the summary and bail if any recorded outcome failed.
///
/// # Errors
///
/// Returns an error if one or more outcomes failed.
pub fn finish(log: &Logger) -> Result<()> {
    log.print_summary();

    let count = log.failure_count();
    if count > 0 {
        anyhow::bail!("{count} entr{} failed", if count == 1 { "y" } else { "ies" });
    }
    Ok(())
}
