//! Backup naming, copying, discovery and restore.
//!
//! A backup lives next to its original as `<name>.bak`. When that name is
//! already taken, a UTC timestamp is appended (`<name>.bak.2024-01-15T10-30-00-123Z`),
//! so backups form an append-only set of generations per original name that
//! [`find_backups`] recovers by scanning the directory.
use std::path::{Path, PathBuf};

use crate::error::LinkError;

use super::{LinkOutcome, probe};

/// Suffix marking a file as a saved copy of a pre-existing file.
pub const BACKUP_MARKER: &str = ".bak";

/// `chrono` format for backup timestamps: ISO-8601 with `:` and `.` replaced by `-`.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H-%M-%S-%3fZ";

/// A backup file found on disk and the original it restores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupRecord {
    /// Path of the backup file.
    pub backup_path: PathBuf,
    /// Path the backup restores to.
    pub original_path: PathBuf,
    /// File name of the original (`original_path`'s basename).
    pub name: String,
}

/// Compute a backup path for `original` that does not collide with any
/// existing file.
///
/// Returns `<original>.bak` when free; otherwise a timestamped name, with a
/// `-N` counter appended in the unlikely case that is taken too.
#[must_use]
pub fn backup_path(original: &Path) -> PathBuf {
    let plain = with_suffix(original, BACKUP_MARKER);
    if !is_taken(&plain) {
        return plain;
    }

    let timestamp = chrono::Utc::now().format(TIMESTAMP_FORMAT).to_string();
    let stamped = with_suffix(original, &format!("{BACKUP_MARKER}.{timestamp}"));
    if !is_taken(&stamped) {
        return stamped;
    }
    (1u32..)
        .map(|n| with_suffix(original, &format!("{BACKUP_MARKER}.{timestamp}-{n}")))
        .find(|candidate| !is_taken(candidate))
        .unwrap_or(stamped)
}

/// Copy the regular file at `path` to a fresh backup path.
///
/// Returns `None` without doing anything when `path` is missing or is a
/// symlink: copying a link would save its target's content and lose the fact
/// that it was a link. A failed copy is logged and also returns `None`.
/// Permission bits are preserved.
#[must_use]
pub fn backup_file(path: &Path) -> Option<PathBuf> {
    if !probe::exists(path) || probe::is_symlink(path) {
        return None;
    }

    let backup = backup_path(path);
    match std::fs::copy(path, &backup) {
        Ok(_) => {
            // Some platforms carry the original's mtime over; generations sort by it.
            if let Err(err) = touch(&backup) {
                tracing::debug!("could not update mtime of {}: {err}", backup.display());
            }
            tracing::info!("backed up: {} → {}", file_label(path), file_label(&backup));
            Some(backup)
        }
        Err(err) => {
            tracing::warn!("could not backup {}: {err}", path.display());
            None
        }
    }
}

/// List the backups stored directly in `directory`.
///
/// Recognises `<name>.bak` and `<name>.bak.<timestamp>` as written by
/// [`backup_path`]; other names are ignored. Results are grouped by original
/// name and ordered oldest generation first: timestamped backups by their
/// parsed timestamp, a plain `.bak` by its modification time. A missing or
/// unreadable directory yields an empty list.
#[must_use]
pub fn find_backups(directory: &Path) -> Vec<BackupRecord> {
    let Ok(entries) = std::fs::read_dir(directory) else {
        return Vec::new();
    };

    let mut backups: Vec<((i64, u32), BackupRecord)> = entries
        .flatten()
        .filter_map(|entry| {
            let file_name = entry.file_name();
            let file_name = file_name.to_str()?;
            let name = original_name(file_name)?;
            Some((
                generation(&entry, file_name, name),
                BackupRecord {
                    backup_path: directory.join(file_name),
                    original_path: directory.join(name),
                    name: name.to_string(),
                },
            ))
        })
        .collect();
    backups.sort_by(|(a_gen, a), (b_gen, b)| {
        a.name
            .cmp(&b.name)
            .then(a_gen.cmp(b_gen))
            .then_with(|| a.backup_path.cmp(&b.backup_path))
    });
    backups.into_iter().map(|(_, record)| record).collect()
}

/// Move `record`'s backup over its original path.
///
/// Whatever file or link sits at the original path is removed first. Never
/// fails past this boundary: errors become a failed outcome.
#[must_use]
pub fn restore_from_backup(record: &BackupRecord) -> LinkOutcome {
    match restore(record) {
        Ok(()) => LinkOutcome::installed(
            &record.name,
            format!("restored from {}", file_label(&record.backup_path)),
        ),
        Err(err) => LinkOutcome::failed(&record.name, err.to_string()),
    }
}

fn restore(record: &BackupRecord) -> Result<(), LinkError> {
    let restore_err = |source| LinkError::Restore {
        backup: record.backup_path.clone(),
        source,
    };

    // The backup must still be there before anything at the original is touched.
    std::fs::symlink_metadata(&record.backup_path).map_err(restore_err)?;

    if probe::is_symlink(&record.original_path) || probe::exists(&record.original_path) {
        std::fs::remove_file(&record.original_path).map_err(restore_err)?;
    }
    std::fs::rename(&record.backup_path, &record.original_path).map_err(restore_err)?;
    tracing::debug!(
        "restored {} from {}",
        record.original_path.display(),
        record.backup_path.display()
    );
    Ok(())
}

/// Recover the original file name from a backup file name.
///
/// Returns `None` for names that are not backups produced by [`backup_path`].
fn original_name(file_name: &str) -> Option<&str> {
    let index = file_name.rfind(BACKUP_MARKER)?;
    let (name, rest) = file_name.split_at(index);
    let suffix = rest.strip_prefix(BACKUP_MARKER)?;
    if name.is_empty() {
        return None;
    }
    if suffix.is_empty() || suffix.strip_prefix('.').is_some_and(is_timestamp) {
        Some(name)
    } else {
        None
    }
}

/// Sort key for one generation of `name`: creation time in milliseconds, then
/// a rank that puts a plain `.bak` ahead of timestamped backups from the same
/// millisecond and orders `-N` collision counters.
fn generation(entry: &std::fs::DirEntry, file_name: &str, name: &str) -> (i64, u32) {
    let stamped = file_name
        .strip_prefix(name)
        .and_then(|rest| rest.strip_prefix(BACKUP_MARKER))
        .and_then(|rest| rest.strip_prefix('.'))
        .and_then(|stamp| {
            let (time, counter) = match stamp.rsplit_once("Z-") {
                Some((time, n)) => (format!("{time}Z"), n.parse::<u32>().ok()?),
                None => (stamp.to_string(), 0),
            };
            let parsed = chrono::NaiveDateTime::parse_from_str(&time, TIMESTAMP_FORMAT).ok()?;
            Some((parsed.and_utc().timestamp_millis(), counter.saturating_add(1)))
        });
    stamped.unwrap_or_else(|| {
        let modified = entry
            .metadata()
            .and_then(|meta| meta.modified())
            .map_or(i64::MIN, |time| {
                chrono::DateTime::<chrono::Utc>::from(time).timestamp_millis()
            });
        (modified, 0)
    })
}

/// Whether `s` starts like a backup timestamp: `YYYY-MM-DDT`.
fn is_timestamp(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 11
        && bytes.iter().take(11).enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            10 => *b == b'T',
            _ => b.is_ascii_digit(),
        })
}

/// Whether anything, including a dangling link, already sits at `path`.
fn is_taken(path: &Path) -> bool {
    probe::exists(path) || probe::is_symlink(path)
}

fn touch(path: &Path) -> std::io::Result<()> {
    std::fs::File::options()
        .write(true)
        .open(path)?
        .set_modified(std::time::SystemTime::now())
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut raw = path.as_os_str().to_os_string();
    raw.push(suffix);
    PathBuf::from(raw)
}

/// The file name of `path`, or the whole path when it has none.
pub(crate) fn file_label(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}
