//! Where run logs live and how their lines are stamped.
use std::path::PathBuf;

/// Directory under the cache root holding one log per command.
const LOG_DIR: &str = "kitlink";

/// Timestamp of the run header.
pub(super) const HEADER_TIME: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Timestamp prefixed to every log line.
pub(super) const LINE_TIME: &str = "%H:%M:%S%.3f";

/// Return the log file path for `command`, creating its directory.
///
/// The cache root is `$XDG_CACHE_HOME`, else `.cache` under the home
/// directory. Without either there is no log file.
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    let dir = cache_root()?.join(LOG_DIR);
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir.join(format!("{command}.log")))
}

fn cache_root() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os("XDG_CACHE_HOME").filter(|dir| !dir.is_empty()) {
        return Some(PathBuf::from(dir));
    }
    ["HOME", "USERPROFILE"]
        .into_iter()
        .find_map(std::env::var_os)
        .map(|home| PathBuf::from(home).join(".cache"))
}

/// The current UTC time rendered with `format`.
pub(super) fn utc_now(format: &str) -> String {
    chrono::Utc::now().format(format).to_string()
}
