//! Source directory listing.
use std::path::Path;

use crate::resources::EntryKind;

/// List the names in `dir` that should be linked as `kind`, sorted.
///
/// Hidden names and anything containing `.bak` are skipped, as are symlinks:
/// only real files (or real directories) count. An unreadable or missing
/// directory yields an empty list.
#[must_use]
pub fn directory_items(dir: &Path, kind: EntryKind) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .flatten()
        .filter(|entry| {
            entry.file_type().is_ok_and(|ft| match kind {
                EntryKind::File => ft.is_file(),
                EntryKind::Directory => ft.is_dir(),
            })
        })
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| !name.starts_with('.') && !name.contains(".bak"))
        .collect();
    names.sort();
    names
}

/// List the stems of regular files in `dir` ending in `.{extension}`, sorted.
#[must_use]
pub fn files_with_extension(dir: &Path, extension: &str) -> Vec<String> {
    let mut stems: Vec<String> = directory_items(dir, EntryKind::File)
        .into_iter()
        .filter_map(|name| {
            let path = Path::new(&name);
            if path.extension()? != extension {
                return None;
            }
            path.file_stem()?.to_str().map(str::to_string)
        })
        .collect();
    stems.sort();
    stems
}
