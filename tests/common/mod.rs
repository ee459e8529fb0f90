// Shared helpers for integration tests.
//
// Provides a temporary kit directory and a temporary home directory, plus a
// fluent builder so each integration test can lay out sources and pre-existing
// targets without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use kitlink_cli::cli::GlobalOpts;
use kitlink_cli::config::Paths;

/// An isolated kit root and home directory, both deleted on drop.
pub struct KitFixture {
    /// Kit root holding link sources.
    pub kit: tempfile::TempDir,
    /// Home directory receiving links.
    pub home: tempfile::TempDir,
}

impl KitFixture {
    /// Create empty kit and home directories.
    pub fn new() -> Self {
        Self {
            kit: tempfile::tempdir().expect("create kit dir"),
            home: tempfile::tempdir().expect("create home dir"),
        }
    }

    /// Path to the kit root.
    pub fn kit_path(&self) -> &Path {
        self.kit.path()
    }

    /// Path to the home directory.
    pub fn home_path(&self) -> &Path {
        self.home.path()
    }

    /// `relative` resolved inside the home directory.
    pub fn home_join(&self, relative: &str) -> PathBuf {
        self.home.path().join(relative)
    }

    /// Resolved paths for library calls.
    pub fn paths(&self) -> Paths {
        Paths {
            root: self.kit.path().to_path_buf(),
            home: self.home.path().to_path_buf(),
        }
    }

    /// Global CLI options pointing at this fixture.
    pub fn global(&self, dry_run: bool) -> GlobalOpts {
        GlobalOpts {
            dry_run,
            root: Some(self.kit.path().to_path_buf()),
            home: Some(self.home.path().to_path_buf()),
        }
    }

    /// Read a file in the home directory (following links).
    pub fn read_home(&self, relative: &str) -> String {
        std::fs::read_to_string(self.home_join(relative)).expect("read home file")
    }

    /// Whether `relative` in the home directory is a symlink.
    pub fn is_home_link(&self, relative: &str) -> bool {
        std::fs::symlink_metadata(self.home_join(relative))
            .is_ok_and(|meta| meta.file_type().is_symlink())
    }
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dir");
    }
    std::fs::write(path, content).expect("write file");
}

/// Fluent builder for [`KitFixture`].
pub struct KitBuilder {
    fixture: KitFixture,
}

impl KitBuilder {
    /// Begin building with empty kit and home directories.
    pub fn new() -> Self {
        Self {
            fixture: KitFixture::new(),
        }
    }

    /// Write `content` to `relative` inside the kit.
    pub fn with_kit_file(self, relative: &str, content: &str) -> Self {
        write_file(&self.fixture.kit.path().join(relative), content);
        self
    }

    /// Add an agent file under `agents/`.
    pub fn with_agent(self, name: &str, content: &str) -> Self {
        self.with_kit_file(&format!("agents/{name}"), content)
    }

    /// Add a skill directory under `skills/` containing a `SKILL.md`.
    pub fn with_skill(self, name: &str) -> Self {
        self.with_kit_file(&format!("skills/{name}/SKILL.md"), name)
    }

    /// Add a command file under `commands/`.
    pub fn with_command(self, name: &str) -> Self {
        self.with_kit_file(&format!("commands/{name}.md"), name)
    }

    /// Add a statusline script under `statuslines/`.
    pub fn with_statusline(self, name: &str, content: &str) -> Self {
        self.with_kit_file(&format!("statuslines/{name}.sh"), content)
    }

    /// Write `content` to `relative` inside the home directory.
    pub fn with_home_file(self, relative: &str, content: &str) -> Self {
        write_file(&self.fixture.home_join(relative), content);
        self
    }

    /// Create a directory at `relative` inside the home directory.
    pub fn with_home_dir(self, relative: &str) -> Self {
        std::fs::create_dir_all(self.fixture.home_join(relative)).expect("create home dir");
        self
    }

    /// Create a symlink at `relative` inside the home directory.
    #[cfg(unix)]
    pub fn with_home_link(self, relative: &str, value: &Path) -> Self {
        let link = self.fixture.home_join(relative);
        if let Some(parent) = link.parent() {
            std::fs::create_dir_all(parent).expect("create link parent");
        }
        std::os::unix::fs::symlink(value, link).expect("create home link");
        self
    }

    /// Finish building and return the fixture.
    pub fn build(self) -> KitFixture {
        self.fixture
    }
}
