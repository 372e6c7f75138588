//! annalist - assembles a structured release changelog from git history and
//! an issue tracker.
//!
//! # Overview
//!
//! annalist diffs two points in a repository's commit history, classifies
//! each commit by convention, cross-references commits against an external
//! issue tracker, unifies author/committer identities into a deduplicated
//! registry, and emits a serializable release document for downstream
//! packaging and templating tools.

pub mod commit;
pub mod error;
pub mod git;
pub mod issues;
pub mod release;
pub mod users;

// Re-export commonly used types
pub use commit::{CommitGroup, CommitGroupRegistry, CommitInfo};
pub use error::{DirectoryError, OutputError, SourceError, TrackerError};
pub use git::{CommitRecord, CommitSource, GitCommitSource, RevisionRange};
pub use issues::{IssueDetails, IssueTracker, JiraTracker};
pub use release::{ChangelogAssembler, CommitSummary, IssueSummary, ReleaseSpec, UserDetails};
pub use users::{ScmUserDirectory, UserIdentityResolver};
