//! Command: link individual command files with absolute links.
use anyhow::{Result, bail};

use crate::cli::{CommandsOpts, GlobalOpts};
use crate::config::scan;
use crate::logging::Logger;
use crate::resources::symlink;

use super::CommandSetup;

/// Run the commands command.
///
/// Any existing file at a command's link path is backed up and replaced
/// without asking; links pointing elsewhere are replaced.
///
/// # Errors
///
/// Returns an error if the layout has no commands section, no command files
/// exist, none of the requested names exist, or any link fails.
pub fn run(global: &GlobalOpts, opts: &CommandsOpts, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    let Some(commands) = &setup.layout.commands else {
        bail!("no [commands] section in the layout");
    };
    let source_dir = setup.paths.root.join(&commands.source);
    let target_dir = setup.paths.home.join(&commands.target);

    let available = scan::files_with_extension(&source_dir, &commands.extension);
    if available.is_empty() {
        bail!("No command files found in {}", source_dir.display());
    }

    let selected = select(&available, &opts.names, log);
    if selected.is_empty() {
        bail!("No commands to install");
    }

    log.stage("Linking commands");
    log.info(&format!("source: {}", source_dir.display()));
    log.info(&format!("target: {}", target_dir.display()));
    log.warn("existing command files will be replaced; backups are saved with a .bak extension");

    for name in &selected {
        let file_name = format!("{name}.{}", commands.extension);
        if global.dry_run {
            log.dry_run(&format!(
                "would link {}",
                target_dir.join(&file_name).display()
            ));
            continue;
        }
        let source = source_dir.join(&file_name);
        log.record(&symlink::create_symlink(&source, &target_dir, &file_name));
    }
    if global.dry_run {
        return Ok(());
    }

    super::finish(log)?;

    let suffix = format!(".{}", commands.extension);
    let linked: Vec<String> = log
        .outcomes()
        .iter()
        .filter(|o| !o.is_failed())
        .filter_map(|o| o.name.strip_suffix(&suffix).map(str::to_string))
        .collect();
    if !linked.is_empty() {
        log.info("Available commands (type /command-name):");
        for name in linked {
            log.info(&format!("  /{name}"));
        }
    }
    Ok(())
}

/// Pick the requested names out of `available`, or all of them when none
/// were requested. Unknown names are reported and skipped.
fn select(available: &[String], requested: &[String], log: &Logger) -> Vec<String> {
    if requested.is_empty() {
        return available.to_vec();
    }
    requested
        .iter()
        .filter(|name| {
            let known = available.contains(*name);
            if !known {
                log.warn(&format!("skipped: /{name} (not found)"));
            }
            known
        })
        .cloned()
        .collect()
}
