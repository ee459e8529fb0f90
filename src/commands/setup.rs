//! Command: link the whole layout into the home directory.
use anyhow::Result;

use crate::cli::{GlobalOpts, SetupOpts};
use crate::config::layout::PlannedEntry;
use crate::logging::Logger;
use crate::resources::conflict::{self, ConflictReport};
use crate::resources::state::TargetState;
use crate::resources::{EntryKind, LinkOptions, probe, symlink};

use super::CommandSetup;

/// Run the setup command.
///
/// Every planned entry is checked for conflicts first. Conflicts abort the
/// run before anything changes unless `--force` is given.
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded, conflicts exist
/// without `--force`, or any entry fails to link.
pub fn run(global: &GlobalOpts, opts: &SetupOpts, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    let planned = setup.layout.entries(&setup.paths);
    if planned.is_empty() {
        log.warn(&format!(
            "nothing to link under {}",
            setup.paths.root.display()
        ));
        return Ok(());
    }
    log.info(&format!("{} entries planned", planned.len()));

    log.stage("Checking for conflicts");
    let conflicts = find_conflicts(&planned);
    if conflicts.is_empty() {
        log.info("no conflicts");
    }
    for report in &conflicts {
        log.warn(&report.describe());
        log.info(&format!("  {}", report.planned_action()));
    }

    if global.dry_run {
        log.stage("Planned changes");
        for item in &planned {
            if let Some(action) = preview(item, opts.force) {
                log.dry_run(&format!("{}: {action}", item.entry.name));
            }
        }
        return Ok(());
    }

    if !conflicts.is_empty() && !opts.force {
        anyhow::bail!(
            "{} conflict(s) found; re-run with --force to replace them",
            conflicts.len()
        );
    }

    log.stage("Linking");
    let options = LinkOptions {
        force_replace: opts.force,
    };
    for item in &planned {
        let outcome = symlink::install(&item.entry, item.kind, options);
        log.record(&outcome);
    }

    super::finish(log)
}

/// Collect the conflict report of every planned entry, in plan order.
#[must_use]
pub fn find_conflicts(planned: &[PlannedEntry]) -> Vec<ConflictReport> {
    planned
        .iter()
        .filter_map(|item| conflict::check_conflict(&item.entry, item.kind))
        .collect()
}

/// Describe what installing `item` would do, or `None` if nothing would change.
fn preview(item: &PlannedEntry, force: bool) -> Option<String> {
    let source = item.entry.source();
    let source_present = match item.kind {
        EntryKind::File => probe::exists(&source),
        EntryKind::Directory => probe::is_directory(&source),
    };
    if !source_present {
        return None;
    }

    let target = item.entry.target();
    let action = match TargetState::classify(&source, &target) {
        TargetState::CorrectLink => return None,
        TargetState::NoTarget => "would create link",
        TargetState::StaleLink(_) => "would replace link",
        ref state if !force && state.is_occupied() => "blocked (needs --force)",
        TargetState::OccupiedFile if item.kind == EntryKind::File => {
            "would back up file and create link"
        }
        TargetState::OccupiedDirectory if item.kind == EntryKind::Directory => {
            "would remove directory and create link"
        }
        _ => "would fail: target cannot be replaced",
    };
    Some(format!("{action} at {}", target.display()))
}
