#![cfg(unix)]
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for the link lifecycle: preview, install, back up,
//! and restore, driven through the public library API.

mod common;

use std::path::PathBuf;

use common::KitBuilder;
use kitlink_cli::resources::backup;
use kitlink_cli::resources::conflict::{self, ConflictKind};
use kitlink_cli::resources::symlink;
use kitlink_cli::resources::{Entry, EntryKind, LinkOptions, LinkStatus};

// ---------------------------------------------------------------------------
// Install scenarios
// ---------------------------------------------------------------------------

#[test]
fn install_into_empty_target_links_relatively() {
    let fx = KitBuilder::new().with_agent("note.txt", "hello").build();
    let entry = Entry::new(
        "note.txt",
        fx.kit_path().join("agents"),
        fx.home_join(".claude/agents"),
    );

    let outcome = symlink::create_file_symlink(&entry, LinkOptions::default());

    assert_eq!(outcome.status, LinkStatus::Installed);
    let value = std::fs::read_link(entry.target()).unwrap();
    assert!(value.is_relative(), "link value {value:?} should be relative");
    assert_eq!(fx.read_home(".claude/agents/note.txt"), "hello");
}

#[test]
fn install_is_idempotent() {
    let fx = KitBuilder::new().with_skill("review").build();
    let entry = Entry::new(
        "review",
        fx.kit_path().join("skills"),
        fx.home_join(".claude/skills"),
    );

    let first = symlink::create_directory_symlink(&entry, LinkOptions::default());
    let value = std::fs::read_link(entry.target()).unwrap();
    let second = symlink::create_directory_symlink(&entry, LinkOptions::default());

    assert_eq!(first.status, LinkStatus::Installed);
    assert_eq!(second.status, LinkStatus::Skipped);
    assert_eq!(second.message, "already configured");
    assert_eq!(std::fs::read_link(entry.target()).unwrap(), value);
    assert_eq!(fx.read_home(".claude/skills/review/SKILL.md"), "review");
}

#[test]
fn forced_install_backs_up_then_restore_round_trips() {
    let fx = KitBuilder::new()
        .with_agent("note.txt", "kit version")
        .with_home_file(".claude/agents/note.txt", "old")
        .build();
    let entry = Entry::new(
        "note.txt",
        fx.kit_path().join("agents"),
        fx.home_join(".claude/agents"),
    );

    let report = conflict::check_file_conflict(&entry).expect("plain file is a conflict");
    assert_eq!(report.conflict_kind, ConflictKind::ExistingFile);

    let outcome = symlink::create_file_symlink(&entry, LinkOptions::force());
    assert_eq!(outcome.status, LinkStatus::Installed);
    assert!(fx.is_home_link(".claude/agents/note.txt"));
    assert_eq!(fx.read_home(".claude/agents/note.txt.bak"), "old");

    let backups = backup::find_backups(&fx.home_join(".claude/agents"));
    assert_eq!(backups.len(), 1);
    assert_eq!(backups[0].name, "note.txt");

    let restored = backup::restore_from_backup(&backups[0]);
    assert_eq!(restored.status, LinkStatus::Installed);
    assert_eq!(restored.message, "restored from note.txt.bak");
    assert!(!fx.is_home_link(".claude/agents/note.txt"));
    assert_eq!(fx.read_home(".claude/agents/note.txt"), "old");
    assert!(!fx.home_join(".claude/agents/note.txt.bak").exists());
    assert_eq!(
        std::fs::read_to_string(fx.kit_path().join("agents/note.txt")).unwrap(),
        "kit version",
        "restoring must not write through the link into the kit"
    );
}

#[test]
fn unforced_directory_conflict_leaves_tree_untouched() {
    let fx = KitBuilder::new()
        .with_skill("skills")
        .with_home_file("target/skills/mine.md", "mine")
        .build();
    let entry = Entry::new("skills", fx.kit_path().join("skills"), fx.home_join("target"));

    let outcome = symlink::create_directory_symlink(&entry, LinkOptions::default());

    assert_eq!(outcome.status, LinkStatus::Failed);
    assert!(outcome.message.contains("directory exists"));
    assert!(!fx.is_home_link("target/skills"));
    assert_eq!(fx.read_home("target/skills/mine.md"), "mine");
}

#[test]
fn replaced_link_creates_no_backup() {
    let fx = KitBuilder::new()
        .with_agent("a.md", "new")
        .with_home_file("elsewhere.md", "elsewhere")
        .build();
    let elsewhere = fx.home_join("elsewhere.md");
    std::fs::create_dir_all(fx.home_join(".claude/agents")).unwrap();
    std::os::unix::fs::symlink(&elsewhere, fx.home_join(".claude/agents/a.md")).unwrap();
    let entry = Entry::new("a.md", fx.kit_path().join("agents"), fx.home_join(".claude/agents"));

    let report = conflict::check_file_conflict(&entry).unwrap();
    assert_eq!(report.conflict_kind, ConflictKind::ExistingSymlink);
    assert_eq!(report.existing_link_target, Some(elsewhere.clone()));

    let outcome = symlink::create_file_symlink(&entry, LinkOptions::default());
    assert_eq!(outcome.status, LinkStatus::Installed);
    assert_eq!(fx.read_home(".claude/agents/a.md"), "new");
    assert!(backup::find_backups(&fx.home_join(".claude/agents")).is_empty());
    assert_eq!(std::fs::read_to_string(elsewhere).unwrap(), "elsewhere");
}

// ---------------------------------------------------------------------------
// Backups
// ---------------------------------------------------------------------------

#[test]
fn repeated_backups_keep_every_generation() {
    let fx = KitBuilder::new()
        .with_home_file("config.json", "v1")
        .build();
    let original = fx.home_join("config.json");

    let first = backup::backup_file(&original).unwrap();
    std::fs::write(&original, "v2").unwrap();
    let second = backup::backup_file(&original).unwrap();

    assert_ne!(first, second);
    assert_eq!(std::fs::read_to_string(&first).unwrap(), "v1");
    assert_eq!(std::fs::read_to_string(&second).unwrap(), "v2");

    let found: Vec<PathBuf> = backup::find_backups(fx.home_path())
        .into_iter()
        .map(|r| r.backup_path)
        .collect();
    assert_eq!(found, [first, second]);
}

#[test]
fn restore_of_vanished_backup_fails_without_touching_original() {
    let fx = KitBuilder::new()
        .with_home_file("config.json", "current")
        .with_home_file("config.json.bak", "saved")
        .build();
    let record = backup::find_backups(fx.home_path()).remove(0);
    std::fs::remove_file(&record.backup_path).unwrap();

    let outcome = backup::restore_from_backup(&record);

    assert_eq!(outcome.status, LinkStatus::Failed);
    assert!(outcome.message.starts_with("failed to restore"));
    assert_eq!(fx.read_home("config.json"), "current");
}

// ---------------------------------------------------------------------------
// Absolute single-file links
// ---------------------------------------------------------------------------

#[test]
fn absolute_link_backs_up_plain_file_without_force() {
    let fx = KitBuilder::new()
        .with_command("review")
        .with_home_file(".claude/commands/review.md", "my review")
        .build();
    let source = fx.kit_path().join("commands/review.md");
    let target_dir = fx.home_join(".claude/commands");

    let outcome = symlink::create_symlink(&source, &target_dir, "review.md");

    assert_eq!(outcome.status, LinkStatus::Installed);
    assert_eq!(std::fs::read_link(target_dir.join("review.md")).unwrap(), source);
    assert_eq!(fx.read_home(".claude/commands/review.md.bak"), "my review");

    let again = symlink::create_symlink(&source, &target_dir, "review.md");
    assert_eq!(again.status, LinkStatus::Skipped);
    assert_eq!(again.message, "already linked");
}

// ---------------------------------------------------------------------------
// Preview/install agreement
// ---------------------------------------------------------------------------

#[test]
fn entries_without_conflicts_never_fail() {
    let fx = KitBuilder::new()
        .with_agent("fresh.md", "x")
        .with_agent("linked.md", "x")
        .with_skill("review")
        .build();
    let agents = fx.kit_path().join("agents");
    let home_agents = fx.home_join(".claude/agents");
    std::fs::create_dir_all(&home_agents).unwrap();
    std::os::unix::fs::symlink("../../../nowhere", home_agents.join("linked.md")).unwrap();

    let cases = [
        (Entry::new("fresh.md", &agents, &home_agents), EntryKind::File),
        (Entry::new("linked.md", &agents, &home_agents), EntryKind::File),
        (Entry::new("missing.md", &agents, &home_agents), EntryKind::File),
        (
            Entry::new("review", fx.kit_path().join("skills"), fx.home_join(".claude/skills")),
            EntryKind::Directory,
        ),
    ];
    for (entry, kind) in &cases {
        assert!(conflict::check_conflict(entry, *kind).is_none(), "{}", entry.name);
        let outcome = symlink::install(entry, *kind, LinkOptions::default());
        assert_ne!(outcome.status, LinkStatus::Failed, "{outcome}");
    }
}
