//! Release document data model.
//!
//! Field names are a compatibility surface for downstream templating and
//! packaging tools, so everything serializes in camelCase.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Canonical user identity merged from git signatures and tracker profiles.
///
/// Empty strings mean "not known yet". Later partial records enrich an
/// existing identity field by field but never blank out a populated field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetails {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub login: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub avatar_url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
}

impl UserDetails {
    /// True when no field carries any information.
    pub fn is_empty(&self) -> bool {
        self.login.is_empty()
            && self.name.is_empty()
            && self.email.is_empty()
            && self.avatar_url.is_empty()
            && self.url.is_empty()
    }
}

/// One issue or pull request correlated from commit references.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueSummary {
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub body: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<UserDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_by: Option<UserDetails>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assignees: Vec<UserDetails>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_pull_request: bool,
}

/// One commit in the release interval.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitSummary {
    pub sha: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub branch: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<UserDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committer: Option<UserDetails>,
    /// References into the release's issue/PR collections, insertion order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issue_ids: Vec<String>,
}

/// The assembled release document handed to serialization and rendering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseSpec {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commits: Vec<CommitSummary>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<IssueSummary>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pull_requests: Vec<IssueSummary>,
}
