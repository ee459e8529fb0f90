//! Configuration: where the kit and home directories are, and what to link.
pub mod layout;
pub mod scan;
pub mod toml_loader;

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Environment variable naming the kit root.
pub const ROOT_ENV: &str = "KITLINK_ROOT";

/// The two directories every operation works between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    /// Kit root holding the link sources.
    pub root: PathBuf,
    /// Home directory receiving the links.
    pub home: PathBuf,
}

impl Paths {
    /// Resolve both directories from explicit overrides or the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRoot`] or [`ConfigError::MissingHome`]
    /// when a directory cannot be determined.
    pub fn resolve(root: Option<&Path>, home: Option<&Path>) -> Result<Self, ConfigError> {
        Ok(Self {
            root: resolve_root(root)?,
            home: resolve_home(home)?,
        })
    }
}

/// Whether `dir` looks like a kit root.
fn is_kit_root(dir: &Path) -> bool {
    dir.join(layout::LAYOUT_FILE).is_file()
        || dir.join("agents").is_dir()
        || dir.join("skills").is_dir()
}

/// Resolve the kit root.
///
/// Tried in order: the explicit path, `$KITLINK_ROOT`, the directory above
/// the binary (`bin/` or `target/release/`), then the current directory.
///
/// # Errors
///
/// Returns [`ConfigError::MissingRoot`] if none of them applies.
pub fn resolve_root(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(root) = explicit {
        return Ok(root.to_path_buf());
    }

    if let Some(root) = std::env::var_os(ROOT_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(root));
    }

    if let Ok(exe) = std::env::current_exe()
        && let Some(parent) = exe.parent()
    {
        let candidates = [
            parent.join("../.."), // target/release/ → repo root
            parent.join(".."),    // bin/ → repo root
        ];
        for candidate in &candidates {
            if is_kit_root(candidate)
                && let Ok(root) = dunce::canonicalize(candidate)
            {
                return Ok(root);
            }
        }
    }

    if let Ok(cwd) = std::env::current_dir()
        && is_kit_root(&cwd)
    {
        return Ok(cwd);
    }

    Err(ConfigError::MissingRoot)
}

/// Resolve the home directory from the explicit path, `$HOME`, or `%USERPROFILE%`.
///
/// # Errors
///
/// Returns [`ConfigError::MissingHome`] if none is set.
pub fn resolve_home(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(home) = explicit {
        return Ok(home.to_path_buf());
    }
    ["HOME", "USERPROFILE"]
        .into_iter()
        .filter_map(std::env::var_os)
        .find(|v| !v.is_empty())
        .map(PathBuf::from)
        .ok_or(ConfigError::MissingHome)
}
