//! Domain-specific error types for the link engine.
//!
//! Internal installer and restore steps return [`LinkError`]; the public
//! resource functions render it into a failed
//! [`LinkOutcome`](crate::resources::LinkOutcome) so no raw filesystem error
//! reaches the caller. Configuration loading returns [`ConfigError`], which
//! command handlers at the CLI boundary convert to [`anyhow::Error`] via `?`.
//!
//! # Error hierarchy
//!
//! ```text
//! LinkError   — per-entry install/restore failures (become outcome messages)
//! ConfigError — layout loading and path resolution
//! ```
use std::path::PathBuf;

use thiserror::Error;

/// Failures that stop a single entry from reaching its desired state.
///
/// The `Display` text of each variant is the message of the resulting failed
/// outcome, so it names the path involved and, where one exists, the remedy.
#[derive(Error, Debug)]
pub enum LinkError {
    /// A regular file occupies the target and replacement was not forced.
    #[error("file exists at {}. Use force replace to backup and replace it.", .path.display())]
    FileExists {
        /// The occupied target path.
        path: PathBuf,
    },

    /// A real directory occupies the target and replacement was not forced.
    #[error("directory exists at {}. Use force replace to remove it.", .path.display())]
    DirectoryExists {
        /// The occupied target path.
        path: PathBuf,
    },

    /// The target holds something the installer refuses to resolve on its own.
    #[error(
        "{} exists but is not a symlink or {expected}. Remove it manually, force replace cannot.",
        .path.display()
    )]
    UnexpectedOccupant {
        /// The occupied target path.
        path: PathBuf,
        /// What kind of object would have been replaceable (`"directory"`, `"regular file"`).
        expected: &'static str,
    },

    /// The occupying file could not be copied to a backup.
    #[error("failed to backup existing file at {}", .path.display())]
    BackupFailed {
        /// The file that could not be backed up.
        path: PathBuf,
    },

    /// The occupying directory could not be removed.
    #[error("failed to remove existing directory at {}: {source}", .path.display())]
    RemoveDirectory {
        /// The directory that could not be removed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// An existing file or link at the target could not be removed.
    #[error("failed to remove {}: {source}", .path.display())]
    RemoveExisting {
        /// The path that could not be removed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The directory that should hold the link could not be created.
    #[error("failed to create directory {}: {source}", .path.display())]
    CreateParent {
        /// The directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The symlink itself could not be created.
    #[error("failed to create symlink: {source}")]
    CreateLink {
        /// Where the link was to be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A file could not be copied into place.
    #[error("failed to copy {} to {}: {source}", .from.display(), .path.display())]
    Copy {
        /// The file being copied.
        from: PathBuf,
        /// Where the copy was to be written.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A settings file could not be written.
    #[error("failed to write settings at {}: {source}", .path.display())]
    WriteSettings {
        /// The settings file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A backup could not be moved back over its original.
    #[error("failed to restore: {source}")]
    Restore {
        /// The backup file that was being restored.
        backup: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors that arise from configuration loading and path resolution.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An I/O error occurred while reading a config file.
    #[error("IO error reading config file {}: {source}", .path.display())]
    Io {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML or does not match the schema.
    #[error("Invalid TOML in {}: {message}", .path.display())]
    Parse {
        /// Path to the offending file.
        path: PathBuf,
        /// Parser error message.
        message: String,
    },

    /// Neither `--home` nor a home-directory environment variable was provided.
    #[error("cannot determine home directory. Use --home or set HOME")]
    MissingHome,

    /// The kit root could not be located.
    #[error("cannot determine kit root. Use --root or set KITLINK_ROOT env var")]
    MissingRoot,
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn file_exists_names_path_and_remedy() {
        let e = LinkError::FileExists {
            path: PathBuf::from("/home/me/note.txt"),
        };
        assert_eq!(
            e.to_string(),
            "file exists at /home/me/note.txt. Use force replace to backup and replace it."
        );
    }

    #[test]
    fn directory_exists_mentions_directory_exists() {
        let e = LinkError::DirectoryExists {
            path: PathBuf::from("/home/me/skills"),
        };
        assert!(e.to_string().contains("directory exists"));
        assert!(e.to_string().contains("/home/me/skills"));
    }

    #[test]
    fn unexpected_occupant_names_expected_kind() {
        let e = LinkError::UnexpectedOccupant {
            path: PathBuf::from("/t/skills"),
            expected: "directory",
        };
        assert_eq!(
            e.to_string(),
            "/t/skills exists but is not a symlink or directory. \
             Remove it manually, force replace cannot."
        );
    }

    #[test]
    fn operational_failures_include_cause() {
        let e = LinkError::RemoveDirectory {
            path: PathBuf::from("/t/skills"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        };
        assert!(e.to_string().contains("failed to remove existing directory"));
        assert!(e.to_string().contains("permission denied"));

        let e = LinkError::CreateLink {
            path: PathBuf::from("/t/x"),
            source: io::Error::other("read-only file system"),
        };
        assert_eq!(
            e.to_string(),
            "failed to create symlink: read-only file system"
        );
    }

    #[test]
    fn restore_error_has_source() {
        use std::error::Error as StdError;
        let e = LinkError::Restore {
            backup: PathBuf::from("/t/x.bak"),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        assert!(e.source().is_some());
        assert!(e.to_string().starts_with("failed to restore:"));
    }

    #[test]
    fn config_error_io_display() {
        let e = ConfigError::Io {
            path: PathBuf::from("/kit/links.toml"),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        assert!(e.to_string().contains("/kit/links.toml"));
        assert!(e.to_string().contains("IO error reading config file"));
    }

    #[test]
    fn config_error_converts_to_anyhow() {
        let e = ConfigError::MissingHome;
        let anyhow_err: anyhow::Error = e.into();
        assert!(anyhow_err.to_string().contains("home directory"));
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn all_error_types_are_send_sync() {
        assert_send_sync::<LinkError>();
        assert_send_sync::<ConfigError>();
    }
}
