//! Command: print version information.

/// Version string baked in by `build.rs`, or the crate version in dev builds.
#[must_use]
pub fn version() -> &'static str {
    option_env!("KITLINK_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the kitlink version to stdout.
pub fn run() {
    println!("kitlink {}", version());
}
