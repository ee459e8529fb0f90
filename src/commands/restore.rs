//! Command: move backups back over the links that replaced them.
use anyhow::Result;
use std::path::PathBuf;

use crate::cli::{GlobalOpts, RestoreOpts};
use crate::logging::Logger;
use crate::resources::backup::{self, BackupRecord};

use super::CommandSetup;

/// Run the restore command.
///
/// Backups are restored in the order [`backup::find_backups`] returns them,
/// directory by directory. When a name has several generations, each is
/// restored in turn and the newest ends up in place.
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded or any restore fails.
pub fn run(global: &GlobalOpts, opts: &RestoreOpts, log: &Logger) -> Result<()> {
    let dirs: Vec<PathBuf> = if opts.dirs.is_empty() {
        let setup = CommandSetup::init(global, log)?;
        setup.layout.restore_dirs(&setup.paths)
    } else {
        opts.dirs.clone()
    };

    log.stage("Searching for backups");
    let backups = collect_backups(&dirs, &opts.names);
    if backups.is_empty() {
        log.info("No backup files found.");
        return Ok(());
    }

    log.info(&format!("Found {} backup(s):", backups.len()));
    for record in &backups {
        log.info(&format!(
            "  {} → {}",
            record.backup_path.display(),
            record.original_path.display()
        ));
    }

    if global.dry_run {
        for record in &backups {
            log.dry_run(&format!("would restore {}", record.original_path.display()));
        }
        return Ok(());
    }

    log.stage("Restoring backups");
    for record in &backups {
        log.record(&backup::restore_from_backup(record));
    }

    super::finish(log)
}

/// Find the backups in `dirs`, keeping only those whose original name or
/// backup file name is listed in `names` (all of them if `names` is empty).
#[must_use]
pub fn collect_backups(dirs: &[PathBuf], names: &[String]) -> Vec<BackupRecord> {
    dirs.iter()
        .flat_map(|dir| backup::find_backups(dir))
        .filter(|record| {
            names.is_empty()
                || names.iter().any(|name| {
                    *name == record.name
                        || record
                            .backup_path
                            .file_name()
                            .is_some_and(|file| file == name.as_str())
                })
        })
        .collect()
}
