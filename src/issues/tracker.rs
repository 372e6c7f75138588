//! Issue tracker abstraction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TrackerError;
use crate::release::spec::UserDetails;

/// A raw issue record returned by a tracker lookup, before identity
/// resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueDetails {
    pub key: String,
    pub link: String,
    pub title: String,
    pub body: String,
    pub state: String,
    pub created: Option<DateTime<Utc>>,
    pub author: UserDetails,
    /// `None` when the tracker does not report who closed the issue.
    pub closed_by: Option<UserDetails>,
    /// `None` when the tracker does not report assignees at all.
    pub assignees: Option<Vec<UserDetails>>,
    pub labels: Vec<String>,
    pub is_pull_request: bool,
}

/// Polymorphic issue tracker capability.
///
/// The correlation pipeline only depends on this trait; [`super::jira::JiraTracker`]
/// is the single production implementation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Look up one issue by key. `Ok(None)` means the tracker has no such
    /// issue; that is not an error.
    async fn get_issue(&self, id: &str) -> Result<Option<IssueDetails>, TrackerError>;

    /// Tracker base URL, used in diagnostics.
    fn home_url(&self) -> String;
}
