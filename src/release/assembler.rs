//! Top-level changelog assembly.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::commit::groups::CommitGroupRegistry;
use crate::commit::parser::parse_commit;
use crate::error::SourceError;
use crate::git::range::RevisionRange;
use crate::git::source::{CommitRecord, CommitSource};
use crate::issues::correlate::correlate_issues;
use crate::issues::refs::full_message_text;
use crate::issues::tracker::IssueTracker;
use crate::users::resolver::UserIdentityResolver;

use super::spec::{CommitSummary, ReleaseSpec};

/// Message prefix identifying the commit that performed the prior release.
pub const RELEASE_COMMIT_PREFIX: &str = "release ";

/// Mutable state scoped to one pipeline invocation. Created at pipeline
/// start, discarded at pipeline end, never persisted.
pub struct PipelineState {
    /// Tokens for which a tracker lookup has been attempted; the value
    /// records whether the lookup produced an issue.
    pub(crate) found_issue_names: HashMap<String, bool>,
    /// One-time-warning guard for the missing-tracker case.
    pub(crate) logged_issue_kind: bool,
}

impl PipelineState {
    pub fn new() -> Self {
        Self {
            found_issue_names: HashMap::new(),
            logged_issue_kind: false,
        }
    }
}

impl Default for PipelineState {
    fn default() -> Self {
        Self::new()
    }
}

/// Walks a commit range and accumulates the release document.
pub struct ChangelogAssembler {
    tracker: Option<Arc<dyn IssueTracker>>,
    resolver: UserIdentityResolver,
    registry: CommitGroupRegistry,
    version: String,
}

impl ChangelogAssembler {
    pub fn new(
        tracker: Option<Arc<dyn IssueTracker>>,
        resolver: UserIdentityResolver,
        version: &str,
    ) -> Self {
        Self {
            tracker,
            resolver,
            registry: CommitGroupRegistry::conventional(),
            version: version.to_string(),
        }
    }

    /// Assemble a [`ReleaseSpec`] from the commits in `range`.
    ///
    /// An empty range yields an empty document, not an error. Merge commits
    /// are excluded, and the newest commit is dropped when it is the commit
    /// that performed the prior release.
    pub async fn assemble(
        &mut self,
        source: &dyn CommitSource,
        range: &RevisionRange,
    ) -> Result<ReleaseSpec, SourceError> {
        let mut spec = ReleaseSpec {
            version: self.version.trim_start_matches('v').to_string(),
            ..Default::default()
        };

        let RevisionRange::Range { previous, current } = range else {
            return Ok(spec);
        };

        let mut commits = source.commits_between(previous, current)?;
        if commits
            .first()
            .is_some_and(|c| c.message.starts_with(RELEASE_COMMIT_PREFIX))
        {
            // the prior release's own commit is not part of this release
            commits.remove(0);
        }

        let mut state = PipelineState::new();
        for record in &commits {
            if record.parent_hashes.len() > 1 {
                debug!(commit = %record.hash, "Skipping merge commit");
                continue;
            }
            let summary = self.summarize_commit(record, &mut state, &mut spec).await;
            spec.commits.push(summary);
        }

        Ok(spec)
    }

    async fn summarize_commit(
        &mut self,
        record: &CommitRecord,
        state: &mut PipelineState,
        spec: &mut ReleaseSpec,
    ) -> CommitSummary {
        let info = parse_commit(&record.message, &self.registry);
        debug!(
            commit = %record.hash,
            kind = %info.kind,
            group = %info.group.title,
            "Classified commit"
        );

        let author = if !record.author.name.is_empty() && !record.author.email.is_empty() {
            Some(self.resolver.git_signature_as_user(&record.author).await)
        } else {
            None
        };
        let committer = if !record.committer.name.is_empty() && !record.committer.email.is_empty() {
            Some(self.resolver.git_signature_as_user(&record.committer).await)
        } else {
            None
        };

        let mut summary = CommitSummary {
            sha: record.hash.clone(),
            message: record.message.clone(),
            url: String::new(),
            // TODO: derive the branch from the source HEAD
            branch: "master".to_string(),
            author,
            committer,
            issue_ids: Vec::new(),
        };

        let full_text = full_message_text(record);
        correlate_issues(
            &mut summary,
            &full_text,
            state,
            self.tracker.as_deref(),
            &mut self.resolver,
            spec,
        )
        .await;

        summary
    }
}
