//! Conventional commit parsing.
//!
//! This is a best-effort classifier, not a validator: malformed headers never
//! produce an error, they just land in the fallback group.

use super::groups::{CommitGroup, CommitGroupRegistry};

/// A commit message classified by convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    /// Conventional commit type, empty when the message is unclassified.
    pub kind: String,
    /// Feature or area label from the `(scope)` header suffix, if any.
    pub scope: String,
    /// Message with the `kind(scope):` prefix stripped.
    pub subject: String,
    /// Display group, computed eagerly at parse time.
    pub group: CommitGroup,
}

/// Parse a conventional commit message.
/// See: <https://conventionalcommits.org>
pub fn parse_commit(message: &str, registry: &CommitGroupRegistry) -> CommitInfo {
    let (kind, scope, subject) = split_header(message);
    let group = registry.group_for(&kind).clone();
    CommitInfo {
        kind,
        scope,
        subject,
        group,
    }
}

/// Split a message into `(kind, scope, subject)` on the first `:`.
fn split_header(message: &str) -> (String, String, String) {
    let Some(idx) = message.find(':') else {
        return (String::new(), String::new(), message.to_string());
    };

    let mut kind = &message[..idx];
    let mut scope = "";
    if kind.ends_with(')') {
        // only a `)`-terminated header carries a scope; anything else is
        // tolerated as-is
        if let Some(open) = kind.find('(') {
            if open > 0 {
                scope = kind[open + 1..kind.len() - 1].trim();
                kind = &kind[..open];
            }
        }
    }
    let subject = message[idx + 1..].trim_start();

    (kind.trim().to_string(), scope.to_string(), subject.to_string())
}
