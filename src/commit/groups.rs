//! Fixed mapping from conventional commit kinds to display groups.

use serde::{Deserialize, Serialize};

/// A display group for one conventional commit kind.
///
/// `order` is assigned by registration sequence and is a rendering contract:
/// markdown sections appear in ascending order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitGroup {
    pub title: String,
    pub order: u32,
}

/// Immutable, ordered registry of commit kinds.
///
/// Built once at startup and passed by reference wherever grouping is needed.
/// Unknown and empty kinds fall back to the untitled group, which always
/// exists and sorts last.
#[derive(Debug, Clone)]
pub struct CommitGroupRegistry {
    named: Vec<(String, CommitGroup)>,
    fallback: CommitGroup,
}

impl CommitGroupRegistry {
    /// Registry for Conventional Commit types: <https://conventionalcommits.org>
    pub fn conventional() -> Self {
        Self::new(&[
            ("feat", "New Features"),
            ("fix", "Bug Fixes"),
            ("perf", "Performance Improvements"),
            ("refactor", "Code Refactoring"),
            ("docs", "Documentation"),
            ("test", "Tests"),
            ("revert", "Reverts"),
            ("style", "Styles"),
            ("chore", "Chores"),
        ])
    }

    /// Build a registry from an ordered `(kind, title)` list. The untitled
    /// fallback group is registered last.
    pub fn new(kinds: &[(&str, &str)]) -> Self {
        let named: Vec<(String, CommitGroup)> = kinds
            .iter()
            .enumerate()
            .map(|(i, (kind, title))| {
                (
                    kind.to_lowercase(),
                    CommitGroup {
                        title: (*title).to_string(),
                        order: i as u32 + 1,
                    },
                )
            })
            .collect();
        let fallback = CommitGroup {
            title: String::new(),
            order: named.len() as u32 + 1,
        };
        Self { named, fallback }
    }

    /// Look up the group for a commit kind, case-insensitively.
    pub fn group_for(&self, kind: &str) -> &CommitGroup {
        let kind = kind.to_lowercase();
        self.named
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, group)| group)
            .unwrap_or(&self.fallback)
    }

    /// The group for unknown and empty kinds.
    pub fn default_group(&self) -> &CommitGroup {
        &self.fallback
    }

    /// All groups in registration order, fallback last.
    pub fn ordered_groups(&self) -> impl Iterator<Item = &CommitGroup> {
        self.named
            .iter()
            .map(|(_, group)| group)
            .chain(std::iter::once(&self.fallback))
    }
}
