//! Issue-reference extraction from commit text.

use regex_lite::Regex;

use crate::git::source::CommitRecord;

/// Whole-word issue keys like `ABC-123`: an uppercase-led project key, a
/// hyphen, then digits.
const ISSUE_KEY_PATTERN: &str = r"\b[A-Z][A-Z0-9_]+-\d+\b";

/// Scan text for issue-key tokens, first-occurrence order, deduplicated.
pub fn extract_issue_refs(text: &str) -> Vec<String> {
    let re = Regex::new(ISSUE_KEY_PATTERN).unwrap();

    let mut tokens: Vec<String> = Vec::new();
    for found in re.find_iter(text) {
        let token = found.as_str().trim_start_matches('#').to_string();
        if !tokens.contains(&token) {
            tokens.push(token);
        }
    }
    tokens
}

/// The full commit text scanned for issue references.
///
/// Concatenates the commit's message chain with newline separators. The
/// chain currently holds only the commit's own message; ancestor-message
/// aggregation would extend the chain here without changing callers.
pub fn full_message_text(record: &CommitRecord) -> String {
    let mut answer = String::new();
    for text in [record.message.as_str()] {
        if text.is_empty() {
            continue;
        }
        if !answer.is_empty() && !answer.ends_with('\n') {
            answer.push('\n');
        }
        answer.push_str(text);
    }
    answer
}
