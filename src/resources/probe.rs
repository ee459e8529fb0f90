//! Filesystem probe: existence and type predicates that never fail.
//!
//! These are the only queries the rest of the crate uses to inspect a path.
//! Every I/O error collapses to `false`, with one exception: a link-loop error
//! from a non-following stat is itself proof that the path is a symlink.
use std::io;
use std::path::Path;

/// Return `true` if `path` resolves through normal link-following access.
///
/// Dangling and cyclic links are reported as absent.
#[must_use]
pub fn exists(path: &Path) -> bool {
    std::fs::metadata(path).is_ok()
}

/// Return `true` if `path` itself is a symbolic link, whether or not its
/// target exists.
#[must_use]
pub fn is_symlink(path: &Path) -> bool {
    match std::fs::symlink_metadata(path) {
        Ok(meta) => meta.file_type().is_symlink(),
        Err(err) => is_link_loop(&err),
    }
}

/// Return `true` if `path`, after following links, is a directory.
#[must_use]
pub fn is_directory(path: &Path) -> bool {
    std::fs::metadata(path).is_ok_and(|meta| meta.is_dir())
}

/// Whether `err` is `ELOOP` (too many levels of symbolic links).
fn is_link_loop(err: &io::Error) -> bool {
    #[cfg(unix)]
    {
        err.raw_os_error() == Some(libc::ELOOP)
    }
    #[cfg(not(unix))]
    {
        let _ = err;
        false
    }
}
