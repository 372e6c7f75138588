//! Markdown rendering of the release document.

use std::collections::{BTreeMap, HashMap};

use crate::commit::groups::CommitGroupRegistry;
use crate::commit::parser::{CommitInfo, parse_commit};

use super::spec::{CommitSummary, IssueSummary, ReleaseSpec, UserDetails};

/// Render a markdown view of the release document.
///
/// Commits are grouped by conventional-commit group; sections appear in
/// registry order with the untitled group last.
pub fn render_markdown(spec: &ReleaseSpec, registry: &CommitGroupRegistry) -> String {
    let issue_map: HashMap<&str, &IssueSummary> = spec
        .issues
        .iter()
        .chain(spec.pull_requests.iter())
        .map(|issue| (issue.id.as_str(), issue))
        .collect();

    let mut sections: BTreeMap<u32, (String, Vec<String>)> = BTreeMap::new();
    for commit in &spec.commits {
        let info = parse_commit(&commit.message, registry);
        let line = describe_commit(commit, &info, &issue_map);
        sections
            .entry(info.group.order)
            .or_insert_with(|| (info.group.title.clone(), Vec::new()))
            .1
            .push(line);
    }

    let mut out = String::new();
    if !spec.version.is_empty() {
        out.push_str(&format!("## Changes in version {}\n\n", spec.version));
    }
    for (title, lines) in sections.into_values() {
        if !title.is_empty() {
            out.push_str(&format!("### {}\n\n", title));
        }
        for line in lines {
            out.push_str(&format!("* {}\n", line));
        }
        out.push('\n');
    }
    out
}

/// One commit line: optional scope prefix, first subject line, author link,
/// short issue links.
fn describe_commit(
    commit: &CommitSummary,
    info: &CommitInfo,
    issues: &HashMap<&str, &IssueSummary>,
) -> String {
    let mut line = String::new();
    if !info.scope.is_empty() {
        line.push_str(&info.scope);
        line.push_str(": ");
    }
    line.push_str(info.subject.lines().next().unwrap_or("").trim());

    let user = commit.author.as_ref().or(commit.committer.as_ref());
    line.push_str(&describe_user(user));

    for id in &commit.issue_ids {
        if let Some(issue) = issues.get(id.as_str()) {
            line.push(' ');
            line.push_str(&describe_issue_short(issue));
        }
    }
    line
}

fn describe_issue_short(issue: &IssueSummary) -> String {
    // only numeric ids get the hash prefix
    let prefix = if issue.id.parse::<u64>().is_ok() { "#" } else { "" };
    format!("[{}{}]({})", prefix, issue.id, issue.url)
}

fn describe_user(user: Option<&UserDetails>) -> String {
    let Some(user) = user else {
        return String::new();
    };
    let label = if user.login.is_empty() {
        user.name.as_str()
    } else {
        user.login.as_str()
    };
    if label.is_empty() {
        return String::new();
    }
    if user.url.is_empty() {
        format!(" ({})", label)
    } else {
        format!(" ([{}]({}))", label, user.url)
    }
}
