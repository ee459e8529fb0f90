//! Symlink installer.
//!
//! Each entry point classifies the target with [`TargetState::classify`] and
//! then acts on that classification:
//!
//! | state               | file entry                  | directory entry                  |
//! |---------------------|-----------------------------|----------------------------------|
//! | no target           | link                        | link                             |
//! | correct link        | skip                        | skip                             |
//! | stale link          | replace link                | replace link                     |
//! | regular file        | backup + replace (forced)   | fail                             |
//! | directory           | backup + replace (forced)\* | remove + link (forced)           |
//! | anything else       | fail                        | fail                             |
//!
//! \* a directory cannot be backed up, so this always ends in a backup failure.
use std::path::{Path, PathBuf};

use crate::error::LinkError;

use super::state::{TargetState, normalize_path};
use super::{Entry, EntryKind, LinkOptions, LinkOutcome, backup, probe};

/// Link `entry.target()` to the file `entry.source()` using a relative path.
#[must_use]
pub fn create_file_symlink(entry: &Entry, options: LinkOptions) -> LinkOutcome {
    install(entry, EntryKind::File, options)
}

/// Link `entry.target()` to the directory `entry.source()` using a relative path.
#[must_use]
pub fn create_directory_symlink(entry: &Entry, options: LinkOptions) -> LinkOutcome {
    install(entry, EntryKind::Directory, options)
}

/// Install `entry` as a link of the given kind.
///
/// A missing source (or, for directories, a source that is not a directory)
/// is skipped rather than failed.
#[must_use]
pub fn install(entry: &Entry, kind: EntryKind, options: LinkOptions) -> LinkOutcome {
    let source = entry.source();
    let (present, missing) = match kind {
        EntryKind::File => (probe::exists(&source), "source file does not exist"),
        EntryKind::Directory => (
            probe::is_directory(&source),
            "source directory does not exist",
        ),
    };
    if !present {
        return LinkOutcome::skipped(&entry.name, missing);
    }

    match install_entry(entry, kind, options) {
        Ok(outcome) => outcome,
        Err(err) => LinkOutcome::failed(&entry.name, err.to_string()),
    }
}

fn install_entry(
    entry: &Entry,
    kind: EntryKind,
    options: LinkOptions,
) -> Result<LinkOutcome, LinkError> {
    let source = entry.source();
    let target = entry.target();
    ensure_parent_dir(&target)?;

    match TargetState::classify(&source, &target) {
        TargetState::NoTarget => {}
        TargetState::CorrectLink => {
            return Ok(LinkOutcome::skipped(&entry.name, "already configured"));
        }
        TargetState::StaleLink(previous) => replace_stale_link(&target, previous.as_deref())?,
        TargetState::OccupiedFile | TargetState::OccupiedDirectory
            if kind == EntryKind::File =>
        {
            backup_and_remove(&target, options)?;
        }
        TargetState::OccupiedDirectory => remove_directory(&target, options)?,
        TargetState::OccupiedFile | TargetState::OccupiedOther => {
            return Err(LinkError::UnexpectedOccupant {
                path: target,
                expected: match kind {
                    EntryKind::File => "regular file",
                    EntryKind::Directory => "directory",
                },
            });
        }
    }

    let value = relative_link_value(&source, &target);
    create_link(&value, &target, kind)?;
    Ok(LinkOutcome::installed(
        &entry.name,
        format!("created symlink → {}", value.display()),
    ))
}

/// Link `target_dir/link_name` to `source` using the absolute source path.
///
/// Used for single files without a mirrored source directory. A link is only
/// left alone when its raw value is exactly the absolute source; any other
/// symlink at the target, including a relative one to the same file, is
/// replaced. A regular file is always backed up and replaced, without needing
/// a force flag.
#[must_use]
pub fn create_symlink(source: &Path, target_dir: &Path, link_name: &str) -> LinkOutcome {
    match link_absolute(source, target_dir, link_name) {
        Ok(outcome) => outcome,
        Err(err) => LinkOutcome::failed(link_name, err.to_string()),
    }
}

fn link_absolute(
    source: &Path,
    target_dir: &Path,
    link_name: &str,
) -> Result<LinkOutcome, LinkError> {
    std::fs::create_dir_all(target_dir).map_err(|source| LinkError::CreateParent {
        path: target_dir.to_path_buf(),
        source,
    })?;
    let target = target_dir.join(link_name);
    let absolute = normalize_path(source);

    match TargetState::classify(source, &target) {
        TargetState::NoTarget => {}
        TargetState::CorrectLink => {
            // Only the exact absolute value counts; a relative link is rewritten.
            let value = std::fs::read_link(&target).ok();
            if value.as_deref() == Some(absolute.as_path()) {
                return Ok(LinkOutcome::skipped(link_name, "already linked"));
            }
            replace_stale_link(&target, value.as_deref())?;
        }
        TargetState::StaleLink(previous) => replace_stale_link(&target, previous.as_deref())?,
        TargetState::OccupiedFile => backup_and_remove(&target, LinkOptions::force())?,
        TargetState::OccupiedDirectory | TargetState::OccupiedOther => {
            return Err(LinkError::UnexpectedOccupant {
                path: target,
                expected: "regular file",
            });
        }
    }

    let kind = if probe::is_directory(source) {
        EntryKind::Directory
    } else {
        EntryKind::File
    };
    create_link(&absolute, &target, kind)?;
    Ok(LinkOutcome::installed(link_name, "created"))
}

/// Compute the link value for `source` relative to the directory holding `link`.
///
/// Falls back to the absolute source when no relative path exists (e.g. the
/// two live on different Windows drives).
#[must_use]
pub fn relative_link_value(source: &Path, link: &Path) -> PathBuf {
    let source = normalize_path(source);
    let base = normalize_path(link.parent().unwrap_or_else(|| Path::new(".")));
    pathdiff::diff_paths(&source, &base).unwrap_or(source)
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

fn replace_stale_link(target: &Path, previous: Option<&Path>) -> Result<(), LinkError> {
    remove_symlink(target).map_err(|source| LinkError::RemoveExisting {
        path: target.to_path_buf(),
        source,
    })?;
    tracing::debug!(
        "removed stale link {} (was {})",
        target.display(),
        previous.map_or_else(|| "unreadable".to_string(), |p| p.display().to_string())
    );
    Ok(())
}

fn backup_and_remove(target: &Path, options: LinkOptions) -> Result<(), LinkError> {
    if !options.force_replace {
        return Err(LinkError::FileExists {
            path: target.to_path_buf(),
        });
    }
    if backup::backup_file(target).is_none() {
        return Err(LinkError::BackupFailed {
            path: target.to_path_buf(),
        });
    }
    std::fs::remove_file(target).map_err(|source| LinkError::RemoveExisting {
        path: target.to_path_buf(),
        source,
    })
}

fn remove_directory(target: &Path, options: LinkOptions) -> Result<(), LinkError> {
    if !options.force_replace {
        return Err(LinkError::DirectoryExists {
            path: target.to_path_buf(),
        });
    }
    // `remove_dir_all` unlinks nested symlinks without following them.
    std::fs::remove_dir_all(target).map_err(|source| LinkError::RemoveDirectory {
        path: target.to_path_buf(),
        source,
    })?;
    tracing::info!("removed existing directory: {}", target.display());
    Ok(())
}

/// Create a symlink at `link` whose value is `value`.
fn create_link(value: &Path, link: &Path, kind: EntryKind) -> Result<(), LinkError> {
    let result = {
        #[cfg(unix)]
        {
            let _ = kind;
            std::os::unix::fs::symlink(value, link)
        }
        #[cfg(windows)]
        {
            match kind {
                EntryKind::Directory => std::os::windows::fs::symlink_dir(value, link),
                EntryKind::File => std::os::windows::fs::symlink_file(value, link),
            }
        }
    };
    result.map_err(|source| LinkError::CreateLink {
        path: link.to_path_buf(),
        source,
    })
}

/// Remove a symlink, handling platform differences.
///
/// On Windows, directory symlinks must be removed with `remove_dir` (not `remove_file`).
/// Rust's `symlink_metadata().is_dir()` returns `false` for symlinks, so we check
/// the raw `FILE_ATTRIBUTE_DIRECTORY` flag to detect directory symlinks.
fn remove_symlink(path: &Path) -> std::io::Result<()> {
    let meta = std::fs::symlink_metadata(path)?;
    if is_dir_like(&meta) {
        std::fs::remove_dir(path)
    } else {
        std::fs::remove_file(path)
    }
}

/// Check if metadata represents a directory-like entry.
/// On Windows, `symlink_metadata().is_dir()` returns `false` for directory symlinks,
/// so we check the raw `FILE_ATTRIBUTE_DIRECTORY` bit instead.
fn is_dir_like(meta: &std::fs::Metadata) -> bool {
    #[cfg(windows)]
    {
        use std::os::windows::fs::MetadataExt;
        meta.file_attributes() & 0x10 != 0 // FILE_ATTRIBUTE_DIRECTORY
    }
    #[cfg(not(windows))]
    {
        meta.is_dir()
    }
}
