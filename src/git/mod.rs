//! Git history access using git2-rs.

pub mod range;
pub mod source;
pub mod tags;

pub use range::{RevisionRange, resolve_range};
pub use source::{CommitRecord, CommitSource, GitCommitSource, GitPerson};
pub use tags::{TagInfo, get_version_from_tag, tags_in_history};
