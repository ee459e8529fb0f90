//! Command: list conflicts without changing anything.
use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::logging::Logger;

use super::CommandSetup;
use super::setup::find_conflicts;

/// Run the check command.
///
/// # Errors
///
/// Returns an error only if configuration cannot be loaded; conflicts are
/// reported, not treated as failures.
pub fn run(global: &GlobalOpts, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    let planned = setup.layout.entries(&setup.paths);

    log.stage("Checking for conflicts");
    let conflicts = find_conflicts(&planned);
    for report in &conflicts {
        log.info(&format!("{} [{}]", report.describe(), report.conflict_kind));
        log.debug(&format!("  --force: {}", report.planned_action()));
    }
    log.info(&format!(
        "{} entries checked, {} conflict(s)",
        planned.len(),
        conflicts.len()
    ));
    Ok(())
}
