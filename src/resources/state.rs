//! Classification of a target path relative to the source it should link to.
//!
//! [`TargetState::classify`] is the single decision point shared by the
//! read-only conflict preview and the mutating installer, so both always agree
//! about what occupies a target.
use std::path::{Component, Path, PathBuf};

use super::probe;

/// What currently occupies a link target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetState {
    /// Nothing exists at the target, not even a dangling link.
    NoTarget,
    /// A symlink that already resolves to the intended source.
    CorrectLink,
    /// A symlink pointing anywhere else. Carries the raw link value when it
    /// could be read.
    StaleLink(Option<PathBuf>),
    /// A regular file.
    OccupiedFile,
    /// A real directory (not a link to one).
    OccupiedDirectory,
    /// Something that is neither a link, a regular file nor a directory.
    OccupiedOther,
}

impl TargetState {
    /// Classify `target` against the `source` it is meant to link to.
    ///
    /// Never touches the filesystem beyond `lstat` and `readlink`, and never
    /// caches: two calls observe the filesystem independently.
    #[must_use]
    pub fn classify(source: &Path, target: &Path) -> Self {
        if probe::is_symlink(target) {
            return match std::fs::read_link(target) {
                Ok(value) if link_resolves_to(target, &value, source) => Self::CorrectLink,
                Ok(value) => Self::StaleLink(Some(value)),
                Err(_) => Self::StaleLink(None),
            };
        }
        match std::fs::symlink_metadata(target) {
            Err(_) => Self::NoTarget,
            Ok(meta) if meta.is_dir() => Self::OccupiedDirectory,
            Ok(meta) if meta.is_file() => Self::OccupiedFile,
            Ok(_) => Self::OccupiedOther,
        }
    }

    /// Return `true` if something other than the correct link occupies the target.
    #[must_use]
    pub const fn is_occupied(&self) -> bool {
        matches!(
            self,
            Self::OccupiedFile | Self::OccupiedDirectory | Self::OccupiedOther
        )
    }
}

/// Whether the link at `link` with value `value` resolves to `source`.
///
/// Relative values are resolved against the link's own directory.
#[must_use]
pub fn link_resolves_to(link: &Path, value: &Path, source: &Path) -> bool {
    let base = link.parent().unwrap_or_else(|| Path::new("."));
    normalize_path(&base.join(value)) == normalize_path(source)
}

/// Make `path` absolute and fold `.` and `..` components lexically.
///
/// Symlinks inside the path are not resolved. On Windows the `\\?\`
/// verbatim prefix is stripped so `read_link` values compare equal to
/// ordinary paths.
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut normalized = PathBuf::new();
    for component in dunce::simplified(&absolute).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}
