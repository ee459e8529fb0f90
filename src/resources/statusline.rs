//! Statusline script installation and the `statusLine` settings block.
//!
//! Unlike the link entries, a statusline is installed as a copy: the script is
//! written to its target with mode `0755`, and the settings file is updated in
//! place to point at it. Whatever either step replaces is backed up first.
use std::path::Path;

use serde_json::{Map, Value, json};

use crate::error::LinkError;

use super::backup::{self, file_label};
use super::{LinkOutcome, LinkStatus, probe};

/// Key of the settings block that configures the statusline.
pub const STATUS_LINE_KEY: &str = "statusLine";

/// Permission bits given to an installed script.
#[cfg(unix)]
const SCRIPT_MODE: u32 = 0o755;

/// Copy `script` to `target` and make it executable.
///
/// An identical executable copy already at `target` is skipped. A regular file
/// there is backed up first; a symlink is removed rather than written through.
/// The returned outcomes are the backup (if one was made) followed by the
/// install result.
#[must_use]
pub fn install_script(script: &Path, target: &Path) -> Vec<LinkOutcome> {
    let name = file_label(target);
    if is_current_copy(script, target) {
        return vec![LinkOutcome::skipped(name, "already installed")];
    }

    let mut outcomes = Vec::new();
    let result = copy_script(script, target, &mut outcomes);
    outcomes.push(match result {
        Ok(()) => LinkOutcome::installed(&name, format!("copied from {}", file_label(script))),
        Err(err) => LinkOutcome::failed(&name, err.to_string()),
    });
    outcomes
}

/// Point the settings file at `path` to the statusline `command`.
///
/// Every other key in the file is kept. An unreadable or malformed file is
/// replaced by a fresh object, after being backed up like any other change.
/// Skipped when the block is already up to date.
#[must_use]
pub fn configure_settings(path: &Path, command: &str) -> Vec<LinkOutcome> {
    let name = file_label(path);
    let desired = status_line(command);
    let mut settings = read_settings(path);
    if settings.get(STATUS_LINE_KEY) == Some(&desired) {
        return vec![LinkOutcome::skipped(name, "statusLine already configured")];
    }

    let mut outcomes = Vec::new();
    settings.insert(STATUS_LINE_KEY.to_string(), desired);
    let result = write_settings(path, settings, &mut outcomes);
    outcomes.push(match result {
        Ok(()) => LinkOutcome::installed(&name, format!("statusLine runs {command}")),
        Err(err) => LinkOutcome::failed(&name, err.to_string()),
    });
    outcomes
}

/// The `statusLine` block for `command`.
#[must_use]
pub fn status_line(command: &str) -> Value {
    json!({
        "type": "command",
        "command": command,
        "padding": 0,
    })
}

fn copy_script(
    script: &Path,
    target: &Path,
    outcomes: &mut Vec<LinkOutcome>,
) -> Result<(), LinkError> {
    ensure_parent_dir(target)?;
    if probe::is_symlink(target) {
        std::fs::remove_file(target).map_err(|source| LinkError::RemoveExisting {
            path: target.to_path_buf(),
            source,
        })?;
    } else if probe::exists(target) {
        save_backup(target, outcomes)?;
    }

    let copy_err = |source: std::io::Error| LinkError::Copy {
        from: script.to_path_buf(),
        path: target.to_path_buf(),
        source,
    };
    std::fs::copy(script, target).map_err(copy_err)?;
    make_executable(target).map_err(copy_err)?;
    tracing::debug!("installed {} → {}", script.display(), target.display());
    Ok(())
}

/// Whether `target` already is an executable copy of `script`.
fn is_current_copy(script: &Path, target: &Path) -> bool {
    if probe::is_symlink(target) {
        return false;
    }
    let (Ok(installed), Ok(wanted)) = (std::fs::read(target), std::fs::read(script)) else {
        return false;
    };
    installed == wanted && is_executable(target)
}

fn read_settings(path: &Path) -> Map<String, Value> {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Map::new();
    };
    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            tracing::warn!("{} is not a JSON object, starting fresh", path.display());
            Map::new()
        }
        Err(err) => {
            tracing::warn!("could not parse {}: {err}; starting fresh", path.display());
            Map::new()
        }
    }
}

fn write_settings(
    path: &Path,
    settings: Map<String, Value>,
    outcomes: &mut Vec<LinkOutcome>,
) -> Result<(), LinkError> {
    ensure_parent_dir(path)?;
    // A linked settings file is updated through its link, so there is nothing
    // local to back up.
    if probe::exists(path) && !probe::is_symlink(path) {
        save_backup(path, outcomes)?;
    }

    let write_err = |source: std::io::Error| LinkError::WriteSettings {
        path: path.to_path_buf(),
        source,
    };
    let mut content = serde_json::to_string_pretty(&Value::Object(settings))
        .map_err(|err| write_err(err.into()))?;
    content.push('\n');
    std::fs::write(path, content).map_err(write_err)
}

fn save_backup(path: &Path, outcomes: &mut Vec<LinkOutcome>) -> Result<(), LinkError> {
    let Some(saved) = backup::backup_file(path) else {
        return Err(LinkError::BackupFailed {
            path: path.to_path_buf(),
        });
    };
    outcomes.push(LinkOutcome::new(
        file_label(path),
        LinkStatus::BackedUp,
        format!("saved as {}", file_label(&saved)),
    ));
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> Result<(), LinkError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| LinkError::CreateParent {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

#[cfg(unix)]
fn make_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt as _;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(SCRIPT_MODE))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt as _;
    std::fs::metadata(path).is_ok_and(|meta| meta.permissions().mode() & 0o777 == SCRIPT_MODE)
}

#[cfg(not(unix))]
fn is_executable(_path: &Path) -> bool {
    true
}
