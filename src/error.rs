//! Error types for annalist modules using thiserror.

use thiserror::Error;

/// Errors from the git commit source.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to open repository: {0}")]
    OpenRepository(#[source] git2::Error),

    #[error("Failed to find reference '{0}': {1}")]
    ReferenceNotFound(String, #[source] git2::Error),

    #[error("Failed to parse commit: {0}")]
    ParseCommit(#[source] git2::Error),

    #[error("Failed to walk commit history: {0}")]
    RevwalkError(#[source] git2::Error),
}

/// Errors from issue tracker lookups.
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error(
        "Issue tracker authentication failed for {url}. Check the configured username and API token."
    )]
    AuthenticationFailed { url: String },

    #[error("Failed to query issue tracker: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Issue tracker returned unexpected status {status} for issue {id}")]
    UnexpectedStatus { id: String, status: u16 },

    #[error("Failed to decode issue tracker response for {id}: {source}")]
    Decode {
        id: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Errors from SCM user directory lookups.
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error(
        "SCM authentication failed: no valid auth found. Run 'gh auth login' or set GITHUB_TOKEN environment variable"
    )]
    AuthenticationFailed,

    #[error("Failed to build SCM client: {0}")]
    ClientBuild(#[source] Box<octocrab::Error>),

    #[error("Failed to look up user '{login}': {source}")]
    Lookup {
        login: String,
        #[source]
        source: Box<octocrab::Error>,
    },
}

/// Errors from writing the release document.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to serialize release document: {0}")]
    Serialize(#[source] serde_yaml::Error),

    #[error("Failed to write release document: {0}")]
    Write(#[source] std::io::Error),
}
