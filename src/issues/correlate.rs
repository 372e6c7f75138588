//! Correlation of extracted issue references against the tracker.

use tracing::warn;

use crate::release::assembler::PipelineState;
use crate::release::spec::{CommitSummary, IssueSummary, ReleaseSpec};
use crate::users::resolver::UserIdentityResolver;

use super::refs::extract_issue_refs;
use super::tracker::IssueTracker;

/// Resolve the issue references in one commit's full text and attach them to
/// the commit and the release document.
///
/// Lookups are global across the run: a reference seen in ten commits is
/// fetched once and inserted once into the release's issue/PR collections,
/// while every referencing commit gets it in `issue_ids`. A failed or empty
/// lookup drops the token for every commit; it never aborts assembly.
pub async fn correlate_issues(
    commit: &mut CommitSummary,
    full_text: &str,
    state: &mut PipelineState,
    tracker: Option<&dyn IssueTracker>,
    resolver: &mut UserIdentityResolver,
    spec: &mut ReleaseSpec,
) {
    let tokens = extract_issue_refs(full_text);
    if tokens.is_empty() {
        return;
    }

    let Some(tracker) = tracker else {
        if !state.logged_issue_kind {
            state.logged_issue_kind = true;
            warn!(
                "No issue tracker configured; references such as {} will not be resolved",
                tokens[0]
            );
        }
        return;
    };

    for token in tokens {
        if let Some(resolved) = state.found_issue_names.get(&token) {
            if *resolved {
                commit.issue_ids.push(token);
            }
            continue;
        }
        // mark the token seen before the lookup so it is fetched at most once
        state.found_issue_names.insert(token.clone(), false);

        let issue = match tracker.get_issue(&token).await {
            Ok(Some(issue)) => issue,
            Ok(None) => {
                warn!(
                    "Failed to find issue {} in issue tracker {}",
                    token,
                    tracker.home_url()
                );
                continue;
            }
            Err(e) => {
                warn!(
                    "Failed to lookup issue {} in issue tracker {} due to {}",
                    token,
                    tracker.home_url(),
                    e
                );
                continue;
            }
        };

        let author = resolver.resolve(issue.author.clone()).await;

        let closed_by = match &issue.closed_by {
            Some(user) => Some(resolver.resolve(user.clone()).await),
            None => {
                warn!(
                    "Failed to find closedBy user for issue {} in issue tracker {}",
                    token,
                    tracker.home_url()
                );
                None
            }
        };

        let assignees = match issue.assignees.clone() {
            Some(users) => resolver.git_user_slice_as_user_details_slice(users).await,
            None => {
                warn!(
                    "Failed to find assignees for issue {} in issue tracker {}",
                    token,
                    tracker.home_url()
                );
                Vec::new()
            }
        };

        state.found_issue_names.insert(token.clone(), true);
        commit.issue_ids.push(token.clone());

        let summary = IssueSummary {
            id: token,
            url: issue.link,
            title: issue.title,
            body: issue.body,
            state: issue.state,
            author: Some(author),
            closed_by,
            assignees,
            labels: issue.labels,
            creation_timestamp: issue.created,
            is_pull_request: issue.is_pull_request,
        };
        if summary.is_pull_request {
            spec.pull_requests.push(summary);
        } else {
            spec.issues.push(summary);
        }
    }
}
