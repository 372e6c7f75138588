//! Commit source abstraction backed by git2.

use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use git2::{Commit, Oid, Repository};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::SourceError;

use super::tags::tags_in_history;

/// An author or committer signature as read from a commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitPerson {
    pub name: String,
    pub email: String,
    pub when: DateTime<Utc>,
}

/// An immutable commit read from the source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitRecord {
    pub hash: String,
    pub parent_hashes: Vec<String>,
    pub message: String,
    pub author: GitPerson,
    pub committer: GitPerson,
}

/// Read access to a repository's commit history.
///
/// The changelog pipeline only ever talks to this trait; the git2-backed
/// implementation below is the single production source.
pub trait CommitSource {
    /// Commits in `(previous, current]`, newest first.
    fn commits_between(
        &self,
        previous: &str,
        current: &str,
    ) -> Result<Vec<CommitRecord>, SourceError>;

    /// The commit pointed to by the latest tag reachable from HEAD, falling
    /// back to the repository tip when no tags exist. `None` for an empty
    /// repository.
    fn latest_tag_commit(&self) -> Result<Option<String>, SourceError>;

    /// The commit pointed to by the tag preceding the latest one. `None` for
    /// a first release.
    fn previous_tag_commit(&self) -> Result<Option<String>, SourceError>;

    /// The repository's very first commit. `None` for an empty repository.
    fn first_commit(&self) -> Result<Option<String>, SourceError>;
}

/// Production commit source over a local git repository.
pub struct GitCommitSource {
    repo: Repository,
}

impl GitCommitSource {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let repo = Repository::open(path).map_err(SourceError::OpenRepository)?;
        Ok(Self { repo })
    }

    pub fn from_repository(repo: Repository) -> Self {
        Self { repo }
    }

    fn tip(&self) -> Option<Oid> {
        self.repo.head().ok().and_then(|head| head.target())
    }
}

impl CommitSource for GitCommitSource {
    fn commits_between(
        &self,
        previous: &str,
        current: &str,
    ) -> Result<Vec<CommitRecord>, SourceError> {
        let from = resolve_reference(&self.repo, previous)?;
        let to = resolve_reference(&self.repo, current)?;

        let mut revwalk = self.repo.revwalk().map_err(SourceError::RevwalkError)?;
        revwalk.push(to).map_err(SourceError::RevwalkError)?;
        revwalk.hide(from).map_err(SourceError::RevwalkError)?;

        let mut commits = Vec::new();
        for oid_result in revwalk {
            let oid = oid_result.map_err(SourceError::RevwalkError)?;
            let commit = self
                .repo
                .find_commit(oid)
                .map_err(SourceError::ParseCommit)?;
            commits.push(record_from_commit(&commit));
        }

        Ok(commits)
    }

    fn latest_tag_commit(&self) -> Result<Option<String>, SourceError> {
        let tags = tags_in_history(&self.repo)?;
        if let Some(tag) = tags.first() {
            return Ok(Some(tag.oid.to_string()));
        }
        // no tags: the tip stands in for the current release boundary
        Ok(self.tip().map(|oid| oid.to_string()))
    }

    fn previous_tag_commit(&self) -> Result<Option<String>, SourceError> {
        let tags = tags_in_history(&self.repo)?;
        let latest = match tags.first() {
            Some(tag) => tag.oid,
            None => return Ok(None),
        };
        Ok(tags
            .iter()
            .find(|tag| tag.oid != latest)
            .map(|tag| tag.oid.to_string()))
    }

    fn first_commit(&self) -> Result<Option<String>, SourceError> {
        let head = match self.tip() {
            Some(oid) => oid,
            None => return Ok(None),
        };

        let mut revwalk = self.repo.revwalk().map_err(SourceError::RevwalkError)?;
        revwalk.push(head).map_err(SourceError::RevwalkError)?;

        let mut root = head;
        for oid_result in revwalk {
            match oid_result {
                Ok(oid) => root = oid,
                Err(e) => {
                    warn!(
                        "Error during revwalk traversal: {}. Continuing with last valid commit.",
                        e
                    );
                }
            }
        }

        Ok(Some(root.to_string()))
    }
}

/// Build a [`CommitRecord`] from a git2 commit.
fn record_from_commit(commit: &Commit) -> CommitRecord {
    CommitRecord {
        hash: commit.id().to_string(),
        parent_hashes: commit.parent_ids().map(|oid| oid.to_string()).collect(),
        message: commit.message().unwrap_or("").to_string(),
        author: person_from_signature(&commit.author()),
        committer: person_from_signature(&commit.committer()),
    }
}

fn person_from_signature(sig: &git2::Signature<'_>) -> GitPerson {
    GitPerson {
        name: sig.name().unwrap_or("").to_string(),
        email: sig.email().unwrap_or("").to_string(),
        when: Utc
            .timestamp_opt(sig.when().seconds(), 0)
            .single()
            .unwrap_or_else(Utc::now),
    }
}

/// Resolve a reference (tag, branch, commit hash) to an OID.
fn resolve_reference(repo: &Repository, reference: &str) -> Result<Oid, SourceError> {
    // Try as a direct OID first
    if let Ok(oid) = Oid::from_str(reference) {
        if repo.find_commit(oid).is_ok() {
            return Ok(oid);
        }
    }

    // Try as a reference (branch or tag)
    if let Ok(obj) = repo.revparse_single(reference) {
        return Ok(obj
            .peel_to_commit()
            .map_err(SourceError::ParseCommit)?
            .id());
    }

    Err(SourceError::ReferenceNotFound(
        reference.to_string(),
        git2::Error::from_str("Reference not found"),
    ))
}
