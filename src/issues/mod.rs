//! Issue-reference extraction and tracker correlation.

pub mod correlate;
pub mod jira;
pub mod refs;
pub mod tracker;

pub use correlate::correlate_issues;
pub use jira::JiraTracker;
pub use refs::{extract_issue_refs, full_message_text};
pub use tracker::{IssueDetails, IssueTracker};
