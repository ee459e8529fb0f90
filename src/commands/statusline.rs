//! Command: install a statusline script and configure it in the settings.
use anyhow::{Result, bail};

use crate::cli::{GlobalOpts, StatuslineOpts};
use crate::config::scan;
use crate::logging::Logger;
use crate::resources::statusline;

use super::CommandSetup;

/// Extension of statusline scripts in the source directory.
const SCRIPT_EXTENSION: &str = "sh";

/// Run the statusline command.
///
/// Copies the chosen script over the configured target and writes the
/// `statusLine` block into the settings file. Anything replaced along the way
/// is backed up.
///
/// # Errors
///
/// Returns an error if the layout has no statusline section, no scripts
/// exist, the requested one is unknown, or either step fails.
pub fn run(global: &GlobalOpts, opts: &StatuslineOpts, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    let Some(config) = &setup.layout.statusline else {
        bail!("no [statusline] section in the layout");
    };
    let source_dir = setup.paths.root.join(&config.source);

    let available = scan::files_with_extension(&source_dir, SCRIPT_EXTENSION);
    let Some(name) = opts.name.as_ref().or_else(|| available.first()) else {
        bail!("No statusline scripts found in {}", source_dir.display());
    };
    if !available.contains(name) {
        bail!(
            "statusline '{name}' not found (available: {})",
            available.join(", ")
        );
    }

    let script = source_dir.join(format!("{name}.{SCRIPT_EXTENSION}"));
    let target = setup.paths.home.join(&config.target);
    let settings = setup.paths.home.join(&config.settings);

    log.stage(&format!("Installing statusline: {name}"));
    log.info(&format!("script: {}", target.display()));
    log.info(&format!("settings: {}", settings.display()));

    if global.dry_run {
        log.dry_run(&format!(
            "would copy {} to {}",
            script.display(),
            target.display()
        ));
        log.dry_run(&format!(
            "would set statusLine to {} in {}",
            config.command,
            settings.display()
        ));
        return Ok(());
    }

    for outcome in statusline::install_script(&script, &target) {
        log.record(&outcome);
    }
    for outcome in statusline::configure_settings(&settings, &config.command) {
        log.record(&outcome);
    }

    super::finish(log)?;
    log.info("Restart the agent to see the statusline.");
    Ok(())
}
