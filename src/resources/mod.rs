//! Link reconciliation primitives.
//!
//! Every operation in this module inspects or mutates a single named entry and
//! reports what happened as a [`LinkOutcome`]. Filesystem errors never escape
//! the public installer and restore functions; they are folded into a
//! [`LinkStatus::Failed`] outcome whose message carries the cause.
//!
//! - **[`probe`]** — non-throwing existence and type predicates
//! - **[`state`]** — the shared classification of a target path
//! - **[`conflict`]** — read-only preview of conflicts for confirmation
//! - **[`backup`]** — backup naming, copying, discovery and restore
//! - **[`symlink`]** — the installer that acts on the classification
//! - **[`statusline`]** — copying the statusline script and updating settings
pub mod backup;
pub mod conflict;
pub mod probe;
pub mod state;
pub mod statusline;
pub mod symlink;

use std::fmt;
use std::path::PathBuf;

/// Final status of a single install or restore operation.
///
/// # Examples
///
/// ```
/// use kitlink_cli::resources::LinkStatus;
///
/// assert_eq!(LinkStatus::Installed.to_string(), "installed");
/// assert_eq!(LinkStatus::BackedUp.as_str(), "backed_up");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkStatus {
    /// The link (or restored file) is now in place.
    Installed,
    /// Nothing was done: the source is absent or the link is already correct.
    Skipped,
    /// The entry could not be brought to the desired state.
    Failed,
    /// An existing file was saved to a backup.
    BackedUp,
}

impl LinkStatus {
    /// Stable lowercase identifier for this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Installed => "installed",
            Self::Skipped => "skipped",
            Self::Failed => "failed",
            Self::BackedUp => "backed_up",
        }
    }
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LinkStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Installed, Self::Skipped, Self::Failed, Self::BackedUp]
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown link status: {s}"))
    }
}

/// Result of one installer or restore invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkOutcome {
    /// Logical entry name (file or directory name).
    pub name: String,
    /// What happened.
    pub status: LinkStatus,
    /// Human-readable detail, e.g. the link value written or the failure cause.
    pub message: String,
}

impl LinkOutcome {
    /// Build an outcome with an explicit status.
    #[must_use]
    pub fn new(name: impl Into<String>, status: LinkStatus, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status,
            message: message.into(),
        }
    }

    /// Shorthand for a [`LinkStatus::Installed`] outcome.
    #[must_use]
    pub fn installed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, LinkStatus::Installed, message)
    }

    /// Shorthand for a [`LinkStatus::Skipped`] outcome.
    #[must_use]
    pub fn skipped(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, LinkStatus::Skipped, message)
    }

    /// Shorthand for a [`LinkStatus::Failed`] outcome.
    #[must_use]
    pub fn failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, LinkStatus::Failed, message)
    }

    /// Return `true` if this outcome is a failure.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.status == LinkStatus::Failed
    }
}

impl fmt::Display for LinkOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.message)
    }
}

/// Whether an entry is linked as a single file or as a whole directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// A single file.
    File,
    /// A directory linked as one unit.
    Directory,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::File => "file",
            Self::Directory => "directory",
        })
    }
}

/// A named entry linked from `source_dir/name` to `target_dir/name`.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use kitlink_cli::resources::Entry;
///
/// let entry = Entry::new("note.txt", "/kit/agents", "/home/me/.claude/agents");
/// assert_eq!(entry.source(), Path::new("/kit/agents/note.txt"));
/// assert_eq!(entry.target(), Path::new("/home/me/.claude/agents/note.txt"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// File or directory name shared by source and target.
    pub name: String,
    /// Directory containing the source.
    pub source_dir: PathBuf,
    /// Directory that receives the link.
    pub target_dir: PathBuf,
}

impl Entry {
    /// Create a new entry.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        source_dir: impl Into<PathBuf>,
        target_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            source_dir: source_dir.into(),
            target_dir: target_dir.into(),
        }
    }

    /// Path of the source this entry links to.
    #[must_use]
    pub fn source(&self) -> PathBuf {
        self.source_dir.join(&self.name)
    }

    /// Path where the link is installed.
    #[must_use]
    pub fn target(&self) -> PathBuf {
        self.target_dir.join(&self.name)
    }
}

/// Options accepted by the entry installers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkOptions {
    /// Allow backing up and replacing an occupying file, or removing an
    /// occupying directory.
    pub force_replace: bool,
}

impl LinkOptions {
    /// Options with `force_replace` set.
    #[must_use]
    pub const fn force() -> Self {
        Self {
            force_replace: true,
        }
    }
}
