//! Link layout: which sources are linked where.
//!
//! Loaded from `<root>/links.toml`; when that file is absent the built-in
//! layout below is used.
use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::{Paths, scan, toml_loader};
use crate::error::ConfigError;
use crate::resources::{Entry, EntryKind};

/// File name of the layout config, relative to the kit root.
pub const LAYOUT_FILE: &str = "links.toml";

/// What each name found in a group's source directory is linked as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupEntries {
    /// Link every regular file.
    Files,
    /// Link every directory as one unit.
    Directories,
}

impl From<GroupEntries> for EntryKind {
    fn from(entries: GroupEntries) -> Self {
        match entries {
            GroupEntries::Files => Self::File,
            GroupEntries::Directories => Self::Directory,
        }
    }
}

/// Link every item of one source directory into one target directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Group {
    /// Source directory, relative to the kit root.
    pub source: String,
    /// Target directory, relative to home.
    pub target: String,
    /// Whether files or directories are linked.
    pub entries: GroupEntries,
}

/// A single named file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileLink {
    /// File name, shared by source and target.
    pub name: String,
    /// Directory holding the file, relative to the kit root.
    pub source: String,
    /// Directory receiving the link, relative to home.
    pub target: String,
}

/// Command files linked individually with absolute links.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandsLink {
    /// Directory holding the command files, relative to the kit root.
    pub source: String,
    /// Directory receiving the links, relative to home.
    pub target: String,
    /// Extension (without the dot) that marks a command file.
    #[serde(default = "default_extension")]
    pub extension: String,
}

/// A statusline script copied from a directory of candidates, plus the
/// settings block that runs it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StatuslineLink {
    /// Directory holding the `*.sh` candidates, relative to the kit root.
    pub source: String,
    /// Path the chosen script is copied to, relative to home.
    pub target: String,
    /// Settings file receiving the `statusLine` block, relative to home.
    pub settings: String,
    /// Command written into the settings block.
    pub command: String,
}

impl Default for StatuslineLink {
    fn default() -> Self {
        Self {
            source: "statuslines".to_string(),
            target: ".claude/statusline.sh".to_string(),
            settings: ".claude/settings.json".to_string(),
            command: "~/.claude/statusline.sh".to_string(),
        }
    }
}

fn default_extension() -> String {
    "md".to_string()
}

fn default_restore() -> Vec<String> {
    vec![".claude".to_string(), ".".to_string()]
}

/// The complete link layout.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Layout {
    /// Directory groups, in declaration order.
    #[serde(default, rename = "group")]
    pub groups: Vec<Group>,
    /// Single files, linked after the groups.
    #[serde(default, rename = "file")]
    pub files: Vec<FileLink>,
    /// Command files, if any.
    #[serde(default)]
    pub commands: Option<CommandsLink>,
    /// Statusline script, if any.
    #[serde(default)]
    pub statusline: Option<StatuslineLink>,
    /// Directories scanned for backups, relative to home.
    #[serde(default = "default_restore")]
    pub restore: Vec<String>,
}

/// One entry the layout wants linked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedEntry {
    /// Name and directories.
    pub entry: Entry,
    /// Link as a file or as a directory.
    pub kind: EntryKind,
}

impl Default for Layout {
    fn default() -> Self {
        let group = |source: &str, target: &str, entries| Group {
            source: source.to_string(),
            target: target.to_string(),
            entries,
        };
        let file = |name: &str, source: &str, target: &str| FileLink {
            name: name.to_string(),
            source: source.to_string(),
            target: target.to_string(),
        };
        Self {
            groups: vec![
                group("agents", ".claude/agents", GroupEntries::Files),
                group("skills", ".claude/skills", GroupEntries::Directories),
                group("hooks", ".claude/hooks", GroupEntries::Files),
            ],
            files: vec![
                file(".mcp.json", ".", "."),
                file("CLAUDE.md", "memory", ".claude"),
            ],
            commands: Some(CommandsLink {
                source: "commands".to_string(),
                target: ".claude/commands".to_string(),
                extension: default_extension(),
            }),
            statusline: Some(StatuslineLink::default()),
            restore: default_restore(),
        }
    }
}

impl Layout {
    /// Load the layout for the kit at `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if `links.toml` exists but cannot be read or parsed.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(LAYOUT_FILE);
        let layout = toml_loader::load_config(&path)?;
        if layout.is_none() {
            tracing::debug!("{} not found, using built-in layout", path.display());
        }
        Ok(layout.unwrap_or_default())
    }

    /// Expand groups and files into concrete entries.
    ///
    /// Groups come first, in declaration order, each listing its source
    /// directory as it is right now; single files follow.
    #[must_use]
    pub fn entries(&self, paths: &Paths) -> Vec<PlannedEntry> {
        let groups = self.groups.iter().flat_map(|group| {
            let source_dir = paths.root.join(&group.source);
            let target_dir = paths.home.join(&group.target);
            let kind = EntryKind::from(group.entries);
            scan::directory_items(&source_dir, kind)
                .into_iter()
                .map(move |name| PlannedEntry {
                    entry: Entry::new(name, &source_dir, &target_dir),
                    kind,
                })
        });
        let files = self.files.iter().map(|file| PlannedEntry {
            entry: Entry::new(
                &file.name,
                paths.root.join(&file.source),
                paths.home.join(&file.target),
            ),
            kind: EntryKind::File,
        });
        groups.chain(files).collect()
    }

    /// Directories to scan for backups.
    #[must_use]
    pub fn restore_dirs(&self, paths: &Paths) -> Vec<PathBuf> {
        self.restore.iter().map(|dir| paths.home.join(dir)).collect()
    }
}
