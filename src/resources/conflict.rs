//! Read-only conflict preview.
//!
//! Reports what occupies each target before anything is changed, so a caller
//! can ask for confirmation (or `--force`) up front.
use std::fmt;
use std::path::PathBuf;

use super::state::TargetState;
use super::{Entry, EntryKind, probe};

/// What kind of object stands in the way of an install.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConflictKind {
    /// A symlink pointing somewhere other than the source.
    ExistingSymlink,
    /// A regular file (or anything that is neither a link nor a directory).
    ExistingFile,
    /// A real directory.
    ExistingDirectory,
}

impl ConflictKind {
    /// Stable identifier for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ExistingSymlink => "existing_symlink",
            Self::ExistingFile => "existing_file",
            Self::ExistingDirectory => "existing_directory",
        }
    }
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single conflict found by [`check_conflict`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictReport {
    /// Logical entry name.
    pub name: String,
    /// Where the link should point.
    pub source_path: PathBuf,
    /// Where the link should live.
    pub target_path: PathBuf,
    /// Whether the entry is linked as a file or a directory.
    pub entry_kind: EntryKind,
    /// What currently occupies the target.
    pub conflict_kind: ConflictKind,
    /// The current link value; set only for [`ConflictKind::ExistingSymlink`].
    pub existing_link_target: Option<PathBuf>,
}

impl ConflictReport {
    /// One-line explanation of what occupies the target.
    #[must_use]
    pub fn describe(&self) -> String {
        let target = self.target_path.display();
        match self.conflict_kind {
            ConflictKind::ExistingSymlink => format!(
                "{target} is a symlink pointing to: {}",
                self.existing_link_target
                    .as_deref()
                    .map_or_else(|| "unknown".to_string(), |p| p.display().to_string())
            ),
            ConflictKind::ExistingDirectory => format!("{target} is an existing directory"),
            ConflictKind::ExistingFile => format!("{target} is an existing file"),
        }
    }

    /// What a forced install will do about this conflict.
    #[must_use]
    pub const fn planned_action(&self) -> &'static str {
        match self.conflict_kind {
            ConflictKind::ExistingSymlink => "Will remove old symlink and create new one",
            ConflictKind::ExistingDirectory => "Will remove directory and create symlink",
            ConflictKind::ExistingFile => "Will backup file and create symlink",
        }
    }
}

/// Check whether installing `entry` as a file link would hit a conflict.
#[must_use]
pub fn check_file_conflict(entry: &Entry) -> Option<ConflictReport> {
    check_conflict(entry, EntryKind::File)
}

/// Check whether installing `entry` as a directory link would hit a conflict.
#[must_use]
pub fn check_directory_conflict(entry: &Entry) -> Option<ConflictReport> {
    check_conflict(entry, EntryKind::Directory)
}

/// Classify `entry`'s target without mutating anything.
///
/// Returns `None` when there is nothing to link, nothing in the way (a
/// dangling link counts as nothing), or the correct link is already in place.
#[must_use]
pub fn check_conflict(entry: &Entry, kind: EntryKind) -> Option<ConflictReport> {
    let source = entry.source();
    let target = entry.target();

    let source_present = match kind {
        EntryKind::File => probe::exists(&source),
        EntryKind::Directory => probe::is_directory(&source),
    };
    if !source_present || !probe::exists(&target) {
        return None;
    }

    let (conflict_kind, existing_link_target) = match TargetState::classify(&source, &target) {
        TargetState::NoTarget | TargetState::CorrectLink => return None,
        TargetState::StaleLink(value) => (ConflictKind::ExistingSymlink, value),
        TargetState::OccupiedDirectory if kind == EntryKind::Directory => {
            (ConflictKind::ExistingDirectory, None)
        }
        TargetState::OccupiedFile
        | TargetState::OccupiedDirectory
        | TargetState::OccupiedOther => (ConflictKind::ExistingFile, None),
    };

    Some(ConflictReport {
        name: entry.name.clone(),
        source_path: source,
        target_path: target,
        entry_kind: kind,
        conflict_kind,
        existing_link_target,
    })
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::resources::symlink;
    use crate::resources::{LinkOptions, LinkStatus};

    fn dirs() -> (tempfile::TempDir, PathBuf, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source");
        let target = dir.path().join("target");
        std::fs::create_dir(&source).unwrap();
        std::fs::create_dir(&target).unwrap();
        (dir, source, target)
    }

    #[test]
    fn missing_source_is_not_a_conflict() {
        let (_dir, source, target) = dirs();
        std::fs::write(target.join("a.md"), "x").unwrap();
        assert!(check_file_conflict(&Entry::new("a.md", &source, &target)).is_none());
    }

    #[test]
    fn missing_target_is_not_a_conflict() {
        let (_dir, source, target) = dirs();
        std::fs::write(source.join("a.md"), "x").unwrap();
        assert!(check_file_conflict(&Entry::new("a.md", &source, &target)).is_none());
    }

    #[test]
    fn plain_file_is_existing_file() {
        let (_dir, source, target) = dirs();
        std::fs::write(source.join("a.md"), "x").unwrap();
        std::fs::write(target.join("a.md"), "y").unwrap();

        let report = check_file_conflict(&Entry::new("a.md", &source, &target)).unwrap();
        assert_eq!(report.conflict_kind, ConflictKind::ExistingFile);
        assert_eq!(report.entry_kind, EntryKind::File);
        assert_eq!(report.target_path, target.join("a.md"));
        assert!(report.existing_link_target.is_none());
        assert_eq!(report.planned_action(), "Will backup file and create symlink");
    }

    #[test]
    fn directory_entry_sees_existing_directory() {
        let (_dir, source, target) = dirs();
        std::fs::create_dir(source.join("skills")).unwrap();
        std::fs::create_dir(target.join("skills")).unwrap();

        let report = check_directory_conflict(&Entry::new("skills", &source, &target)).unwrap();
        assert_eq!(report.conflict_kind, ConflictKind::ExistingDirectory);
        assert_eq!(report.planned_action(), "Will remove directory and create symlink");
    }

    #[test]
    fn directory_entry_with_file_target_is_existing_file() {
        let (_dir, source, target) = dirs();
        std::fs::create_dir(source.join("skills")).unwrap();
        std::fs::write(target.join("skills"), "x").unwrap();

        let report = check_directory_conflict(&Entry::new("skills", &source, &target)).unwrap();
        assert_eq!(report.conflict_kind, ConflictKind::ExistingFile);
    }

    #[test]
    fn directory_entry_needs_directory_source() {
        let (_dir, source, target) = dirs();
        std::fs::write(source.join("skills"), "not a dir").unwrap();
        std::fs::create_dir(target.join("skills")).unwrap();
        assert!(check_directory_conflict(&Entry::new("skills", &source, &target)).is_none());
    }

    #[test]
    fn describe_renders_each_kind() {
        let report = ConflictReport {
            name: "a.md".to_string(),
            source_path: PathBuf::from("/kit/agents/a.md"),
            target_path: PathBuf::from("/home/me/.claude/agents/a.md"),
            entry_kind: EntryKind::File,
            conflict_kind: ConflictKind::ExistingSymlink,
            existing_link_target: Some(PathBuf::from("/old/a.md")),
        };
        insta::assert_snapshot!(
            report.describe(),
            @"/home/me/.claude/agents/a.md is a symlink pointing to: /old/a.md"
        );

        let dir = ConflictReport {
            conflict_kind: ConflictKind::ExistingDirectory,
            existing_link_target: None,
            ..report.clone()
        };
        insta::assert_snapshot!(dir.describe(), @"/home/me/.claude/agents/a.md is an existing directory");

        let file = ConflictReport {
            conflict_kind: ConflictKind::ExistingFile,
            existing_link_target: None,
            ..report
        };
        insta::assert_snapshot!(file.describe(), @"/home/me/.claude/agents/a.md is an existing file");
    }

    #[cfg(unix)]
    #[test]
    fn correct_link_is_not_a_conflict() {
        let (_dir, source, target) = dirs();
        std::fs::write(source.join("a.md"), "x").unwrap();
        std::os::unix::fs::symlink(source.join("a.md"), target.join("a.md")).unwrap();
        assert!(check_file_conflict(&Entry::new("a.md", &source, &target)).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn correct_relative_link_is_not_a_conflict() {
        let (_dir, source, target) = dirs();
        std::fs::write(source.join("a.md"), "x").unwrap();
        std::os::unix::fs::symlink("../source/a.md", target.join("a.md")).unwrap();
        assert!(check_file_conflict(&Entry::new("a.md", &source, &target)).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn stale_link_carries_its_value() {
        let (_dir, source, target) = dirs();
        std::fs::write(source.join("a.md"), "x").unwrap();
        std::fs::write(source.join("b.md"), "y").unwrap();
        std::os::unix::fs::symlink(source.join("b.md"), target.join("a.md")).unwrap();

        let report = check_file_conflict(&Entry::new("a.md", &source, &target)).unwrap();
        assert_eq!(report.conflict_kind, ConflictKind::ExistingSymlink);
        assert_eq!(report.existing_link_target, Some(source.join("b.md")));
        assert_eq!(
            report.planned_action(),
            "Will remove old symlink and create new one"
        );
    }

    #[cfg(unix)]
    #[test]
    fn dangling_link_is_not_a_conflict() {
        let (_dir, source, target) = dirs();
        std::fs::write(source.join("a.md"), "x").unwrap();
        std::os::unix::fs::symlink("gone.md", target.join("a.md")).unwrap();
        assert!(check_file_conflict(&Entry::new("a.md", &source, &target)).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn no_conflict_means_install_does_not_fail() {
        let (_dir, source, target) = dirs();
        std::fs::write(source.join("clean.md"), "x").unwrap();
        std::fs::write(source.join("linked.md"), "x").unwrap();
        std::fs::write(source.join("dangling.md"), "x").unwrap();
        std::fs::create_dir(source.join("skills")).unwrap();
        std::os::unix::fs::symlink(source.join("linked.md"), target.join("linked.md")).unwrap();
        std::os::unix::fs::symlink("nowhere", target.join("dangling.md")).unwrap();
        std::os::unix::fs::symlink("nowhere", target.join("skills")).unwrap();

        for (name, kind) in [
            ("clean.md", EntryKind::File),
            ("linked.md", EntryKind::File),
            ("dangling.md", EntryKind::File),
            ("absent.md", EntryKind::File),
            ("skills", EntryKind::Directory),
        ] {
            let entry = Entry::new(name, &source, &target);
            assert!(check_conflict(&entry, kind).is_none(), "{name}");
            let outcome = symlink::install(&entry, kind, LinkOptions::default());
            assert_ne!(outcome.status, LinkStatus::Failed, "{name}: {outcome}");
        }
    }
}
