//! SCM user directory lookups via the GitHub users API.

use std::env;
use std::process::Command;

use async_trait::async_trait;
use octocrab::Octocrab;
use serde::Deserialize;

use crate::error::DirectoryError;
use crate::release::spec::UserDetails;

/// Resolves a login to profile details on the hosting SCM.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScmUserDirectory: Send + Sync {
    /// `Ok(None)` when the directory has no such user.
    async fn resolve_user(&self, login: &str) -> Result<Option<UserDetails>, DirectoryError>;
}

/// Production user directory over the GitHub users API.
pub struct GithubUserDirectory {
    client: Octocrab,
}

#[derive(Debug, Deserialize)]
struct GithubProfile {
    login: String,
    name: Option<String>,
    email: Option<String>,
    avatar_url: Option<String>,
    html_url: Option<String>,
}

impl GithubUserDirectory {
    /// Build a directory from a personal token.
    pub fn from_token(token: &str) -> Result<Self, DirectoryError> {
        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .build()
            .map_err(|e| DirectoryError::ClientBuild(Box::new(e)))?;
        Ok(Self { client })
    }

    /// Build a directory from a pre-configured client.
    ///
    /// This allows dependency injection for testing with mock servers.
    pub fn with_client(client: Octocrab) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ScmUserDirectory for GithubUserDirectory {
    async fn resolve_user(&self, login: &str) -> Result<Option<UserDetails>, DirectoryError> {
        let result: Result<GithubProfile, octocrab::Error> = self
            .client
            .get(format!("/users/{}", login), None::<&()>)
            .await;

        let profile = match result {
            Ok(profile) => profile,
            Err(e) => {
                // Check error content using both Display and Debug output
                // to handle different octocrab error formats
                let err_display = e.to_string();
                let err_debug = format!("{:?}", e);
                if err_display.contains("Not Found") || err_debug.contains("Not Found") {
                    return Ok(None);
                }
                return Err(DirectoryError::Lookup {
                    login: login.to_string(),
                    source: Box::new(e),
                });
            }
        };

        Ok(Some(UserDetails {
            login: profile.login,
            name: profile.name.unwrap_or_default(),
            email: profile.email.unwrap_or_default(),
            avatar_url: profile.avatar_url.unwrap_or_default(),
            url: profile.html_url.unwrap_or_default(),
        }))
    }
}

/// Get a GitHub token using the configured auth strategy.
///
/// Checks in order:
/// 1. gh CLI auth (via `gh auth token`)
/// 2. GITHUB_TOKEN environment variable
/// 3. GH_TOKEN environment variable
pub fn get_github_token() -> Result<String, DirectoryError> {
    // Try gh CLI first
    if let Some(token) = get_token_from_gh_cli() {
        return Ok(token);
    }

    // Fall back to GITHUB_TOKEN
    if let Ok(token) = env::var("GITHUB_TOKEN") {
        if !token.is_empty() {
            return Ok(token);
        }
    }

    // Fall back to GH_TOKEN
    if let Ok(token) = env::var("GH_TOKEN") {
        if !token.is_empty() {
            return Ok(token);
        }
    }

    Err(DirectoryError::AuthenticationFailed)
}

/// Try to get a token from the gh CLI.
fn get_token_from_gh_cli() -> Option<String> {
    // First check if gh is authenticated
    let status = Command::new("gh").args(["auth", "status"]).output().ok()?;

    if !status.status.success() {
        return None;
    }

    // Get the actual token
    let output = Command::new("gh").args(["auth", "token"]).output().ok()?;

    if output.status.success() {
        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !token.is_empty() {
            return Some(token);
        }
    }

    None
}
