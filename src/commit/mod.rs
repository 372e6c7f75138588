//! Conventional commit classification.

pub mod groups;
pub mod parser;

pub use groups::{CommitGroup, CommitGroupRegistry};
pub use parser::{CommitInfo, parse_commit};
