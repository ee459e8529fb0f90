//! Outcome aggregation for run summaries.
use std::fmt;

use crate::resources::{LinkOutcome, LinkStatus};

/// Per-status counts over a batch of outcomes.
///
/// # Examples
///
/// ```
/// use kitlink_cli::report::Summary;
/// use kitlink_cli::resources::LinkOutcome;
///
/// let outcomes = [
///     LinkOutcome::installed("a.md", "created symlink → ../a.md"),
///     LinkOutcome::skipped("b.md", "already configured"),
/// ];
/// let summary = Summary::from_outcomes(&outcomes);
/// assert_eq!(summary.total(), 2);
/// assert!(!summary.has_failures());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Links created or backups restored.
    pub installed: usize,
    /// Entries left alone.
    pub skipped: usize,
    /// Entries that could not be brought to the desired state.
    pub failed: usize,
    /// Files saved to a backup.
    pub backed_up: usize,
}

impl Summary {
    /// Count `outcomes` by status.
    #[must_use]
    pub fn from_outcomes<'a>(outcomes: impl IntoIterator<Item = &'a LinkOutcome>) -> Self {
        outcomes
            .into_iter()
            .fold(Self::default(), |mut summary, outcome| {
                match outcome.status {
                    LinkStatus::Installed => summary.installed += 1,
                    LinkStatus::Skipped => summary.skipped += 1,
                    LinkStatus::Failed => summary.failed += 1,
                    LinkStatus::BackedUp => summary.backed_up += 1,
                }
                summary
            })
    }

    /// Total number of outcomes counted.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.installed + self.skipped + self.failed + self.backed_up
    }

    /// Return `true` if any outcome failed.
    #[must_use]
    pub const fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} entries: {} installed, {} skipped, {} failed",
            self.total(),
            self.installed,
            self.skipped,
            self.failed
        )?;
        if self.backed_up > 0 {
            write!(f, ", {} backed up", self.backed_up)?;
        }
        Ok(())
    }
}

/// Console icon for an outcome status.
#[must_use]
pub const fn status_icon(status: LinkStatus) -> &'static str {
    match status {
        LinkStatus::Installed => "✓",
        LinkStatus::Skipped => "○",
        LinkStatus::Failed => "✗",
        LinkStatus::BackedUp => "↺",
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn empty_summary() {
        let summary = Summary::from_outcomes(std::iter::empty());
        assert_eq!(summary, Summary::default());
        assert_eq!(summary.total(), 0);
        assert!(!summary.has_failures());
    }

    #[test]
    fn counts_each_status() {
        let outcomes = vec![
            LinkOutcome::installed("a", "created"),
            LinkOutcome::installed("b", "created"),
            LinkOutcome::skipped("c", "already configured"),
            LinkOutcome::failed("d", "file exists"),
            LinkOutcome::new("e", LinkStatus::BackedUp, "saved"),
        ];
        let summary = Summary::from_outcomes(&outcomes);
        assert_eq!(summary.installed, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.backed_up, 1);
        assert_eq!(summary.total(), 5);
        assert!(summary.has_failures());
    }

    #[test]
    fn display_renders_counts() {
        let summary = Summary {
            installed: 3,
            skipped: 1,
            failed: 0,
            backed_up: 0,
        };
        insta::assert_snapshot!(summary.to_string(), @"4 entries: 3 installed, 1 skipped, 0 failed");

        let with_backups = Summary {
            backed_up: 2,
            ..summary
        };
        insta::assert_snapshot!(
            with_backups.to_string(),
            @"6 entries: 3 installed, 1 skipped, 0 failed, 2 backed up"
        );
    }

    #[test]
    fn icons_are_distinct() {
        let icons = [
            status_icon(LinkStatus::Installed),
            status_icon(LinkStatus::Skipped),
            status_icon(LinkStatus::Failed),
            status_icon(LinkStatus::BackedUp),
        ];
        for (i, a) in icons.iter().enumerate() {
            for b in &icons[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
