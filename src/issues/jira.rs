//! Jira REST issue tracker client.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::error::TrackerError;
use crate::release::spec::UserDetails;

use super::tracker::{IssueDetails, IssueTracker};

/// Issue tracker backed by the Jira REST v2 API.
pub struct JiraTracker {
    client: Client,
    server_url: String,
    username: String,
    api_token: String,
}

impl JiraTracker {
    pub fn new(server_url: &str, username: &str, api_token: &str) -> Self {
        Self {
            client: Client::new(),
            server_url: server_url.trim_end_matches('/').to_string(),
            username: username.to_string(),
            api_token: api_token.to_string(),
        }
    }

    fn browse_url(&self, key: &str) -> String {
        format!("{}/browse/{}", self.server_url, key)
    }

    fn to_details(&self, issue: JiraIssue) -> IssueDetails {
        let link = self.browse_url(&issue.key);
        let fields = issue.fields;
        IssueDetails {
            key: issue.key,
            link,
            title: fields.summary.unwrap_or_default(),
            body: fields.description.unwrap_or_default(),
            state: fields.status.and_then(|s| s.name).unwrap_or_default(),
            created: fields.created.as_deref().and_then(parse_jira_time),
            author: fields.reporter.map(to_user_details).unwrap_or_default(),
            // Jira does not report who resolved an issue on this endpoint
            closed_by: None,
            assignees: fields.assignee.map(|a| vec![to_user_details(a)]),
            labels: fields.labels.unwrap_or_default(),
            // Jira tracks no pull requests
            is_pull_request: false,
        }
    }
}

#[async_trait]
impl IssueTracker for JiraTracker {
    async fn get_issue(&self, id: &str) -> Result<Option<IssueDetails>, TrackerError> {
        let url = format!("{}/rest/api/2/issue/{}", self.server_url, id);
        debug!(issue = %id, "Looking up issue in Jira");

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.username, Some(&self.api_token))
            .send()
            .await
            .map_err(TrackerError::Request)?;

        match response.status() {
            StatusCode::NOT_FOUND => return Ok(None),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(TrackerError::AuthenticationFailed {
                    url: self.server_url.clone(),
                });
            }
            status if !status.is_success() => {
                return Err(TrackerError::UnexpectedStatus {
                    id: id.to_string(),
                    status: status.as_u16(),
                });
            }
            _ => {}
        }

        let issue: JiraIssue = response.json().await.map_err(|e| TrackerError::Decode {
            id: id.to_string(),
            source: e,
        })?;

        Ok(Some(self.to_details(issue)))
    }

    fn home_url(&self) -> String {
        self.server_url.clone()
    }
}

#[derive(Debug, Deserialize)]
struct JiraIssue {
    key: String,
    fields: JiraFields,
}

#[derive(Debug, Deserialize)]
struct JiraFields {
    summary: Option<String>,
    description: Option<String>,
    created: Option<String>,
    status: Option<JiraStatus>,
    reporter: Option<JiraUser>,
    assignee: Option<JiraUser>,
    labels: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct JiraStatus {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JiraUser {
    /// Username on Jira Server; absent on Jira Cloud.
    name: Option<String>,
    display_name: Option<String>,
    email_address: Option<String>,
    avatar_urls: Option<HashMap<String, String>>,
    #[serde(rename = "self")]
    self_url: Option<String>,
}

fn to_user_details(user: JiraUser) -> UserDetails {
    let login = user
        .name
        .clone()
        .or_else(|| {
            user.email_address
                .as_deref()
                .and_then(|email| email.split('@').next())
                .map(str::to_string)
        })
        .unwrap_or_default();

    UserDetails {
        login,
        name: user.display_name.unwrap_or_default(),
        email: user.email_address.unwrap_or_default(),
        avatar_url: user
            .avatar_urls
            .as_ref()
            .and_then(|urls| urls.get("48x48"))
            .cloned()
            .unwrap_or_default(),
        url: user.self_url.unwrap_or_default(),
    }
}

/// Parse Jira's timestamp format (`2021-01-01T12:00:00.000+0000`), accepting
/// plain RFC 3339 as well.
fn parse_jira_time(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.3f%z"))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
