//! End-to-end assembly tests: real git repositories, fake issue tracker.

mod common;

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use annalist::error::TrackerError;
use annalist::git::{GitCommitSource, RevisionRange};
use annalist::issues::{IssueDetails, IssueTracker};
use annalist::release::{ChangelogAssembler, UserDetails};
use annalist::users::UserIdentityResolver;
use common::TestRepo;

/// In-memory tracker for integration tests. Records every lookup.
struct FakeTracker {
    issues: HashMap<String, IssueDetails>,
    failing: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl FakeTracker {
    fn new() -> Self {
        Self {
            issues: HashMap::new(),
            failing: HashSet::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn with_issue(mut self, key: &str) -> Self {
        self.issues.insert(
            key.to_string(),
            IssueDetails {
                key: key.to_string(),
                link: format!("https://tracker.example.com/browse/{}", key),
                title: format!("Issue {}", key),
                body: String::new(),
                state: "Done".to_string(),
                created: None,
                author: UserDetails {
                    login: "alice".to_string(),
                    name: "Alice Example".to_string(),
                    ..Default::default()
                },
                closed_by: None,
                assignees: None,
                labels: Vec::new(),
                is_pull_request: false,
            },
        );
        self
    }

    fn with_failing(mut self, key: &str) -> Self {
        self.failing.insert(key.to_string());
        self
    }

    fn lookups_for(&self, key: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|k| k.as_str() == key)
            .count()
    }
}

#[async_trait]
impl IssueTracker for FakeTracker {
    async fn get_issue(&self, id: &str) -> Result<Option<IssueDetails>, TrackerError> {
        self.calls.lock().unwrap().push(id.to_string());
        if self.failing.contains(id) {
            return Err(TrackerError::UnexpectedStatus {
                id: id.to_string(),
                status: 503,
            });
        }
        Ok(self.issues.get(id).cloned())
    }

    fn home_url(&self) -> String {
        "https://tracker.example.com".to_string()
    }
}

fn assembler_with(tracker: Arc<FakeTracker>, version: &str) -> ChangelogAssembler {
    ChangelogAssembler::new(
        Some(tracker),
        UserIdentityResolver::new(None),
        version,
    )
}

#[tokio::test]
async fn test_assembles_commits_and_correlated_issue() {
    let test_repo = TestRepo::new();
    let c0 = test_repo.commit("chore: init");
    let c1 = test_repo.commit("feat: add X");
    let c2 = test_repo.commit("fix: correct Y refs ABC-1");
    let source = GitCommitSource::from_repository(test_repo.repo);

    let tracker = Arc::new(FakeTracker::new().with_issue("ABC-1"));
    let mut assembler = assembler_with(tracker.clone(), "1.0.0");
    let range = RevisionRange::Range {
        previous: c0.to_string(),
        current: c2.to_string(),
    };
    let spec = assembler.assemble(&source, &range).await.unwrap();

    assert_eq!(spec.version, "1.0.0");
    let shas: Vec<String> = spec.commits.iter().map(|c| c.sha.clone()).collect();
    assert_eq!(shas, vec![c2.to_string(), c1.to_string()]);

    assert_eq!(spec.commits[0].issue_ids, vec!["ABC-1"]);
    assert!(spec.commits[1].issue_ids.is_empty());

    assert_eq!(spec.issues.len(), 1);
    assert_eq!(spec.issues[0].id, "ABC-1");
    assert_eq!(spec.issues[0].title, "Issue ABC-1");
    assert!(spec.pull_requests.is_empty());

    assert_eq!(tracker.lookups_for("ABC-1"), 1);
}

#[tokio::test]
async fn test_failed_lookup_does_not_abort_assembly() {
    let test_repo = TestRepo::new();
    let c0 = test_repo.commit("chore: init");
    test_repo.commit("fix: a refs ABC-1");
    let c2 = test_repo.commit("fix: b refs ABC-2");
    let source = GitCommitSource::from_repository(test_repo.repo);

    let tracker = Arc::new(FakeTracker::new().with_issue("ABC-1").with_failing("ABC-2"));
    let mut assembler = assembler_with(tracker.clone(), "1.0.0");
    let range = RevisionRange::Range {
        previous: c0.to_string(),
        current: c2.to_string(),
    };
    let spec = assembler.assemble(&source, &range).await.unwrap();

    assert_eq!(spec.commits.len(), 2);
    assert_eq!(spec.issues.len(), 1);
    assert_eq!(spec.issues[0].id, "ABC-1");
    // the failing key was tried exactly once
    assert_eq!(tracker.lookups_for("ABC-2"), 1);
}

#[tokio::test]
async fn test_issue_referenced_by_many_commits_fetched_once() {
    let test_repo = TestRepo::new();
    let c0 = test_repo.commit("chore: init");
    test_repo.commit("fix: first pass at ABC-1");
    test_repo.commit("fix: second pass at ABC-1");
    let c3 = test_repo.commit("fix: final pass at ABC-1");
    let source = GitCommitSource::from_repository(test_repo.repo);

    let tracker = Arc::new(FakeTracker::new().with_issue("ABC-1"));
    let mut assembler = assembler_with(tracker.clone(), "1.0.0");
    let range = RevisionRange::Range {
        previous: c0.to_string(),
        current: c3.to_string(),
    };
    let spec = assembler.assemble(&source, &range).await.unwrap();

    assert_eq!(spec.commits.len(), 3);
    for summary in &spec.commits {
        assert_eq!(summary.issue_ids, vec!["ABC-1"]);
    }
    assert_eq!(spec.issues.len(), 1);
    assert_eq!(tracker.lookups_for("ABC-1"), 1);
}

#[tokio::test]
async fn test_merge_commits_are_excluded() {
    let test_repo = TestRepo::new();
    let c0 = test_repo.commit("chore: init");
    let side = test_repo.commit_with_parents("feat: side work", &[c0], Some("refs/heads/side"));
    let c1 = test_repo.commit("fix: mainline work");
    let merge =
        test_repo.commit_with_parents("Merge branch 'side'", &[c1, side], Some("HEAD"));
    let source = GitCommitSource::from_repository(test_repo.repo);

    let mut assembler = assembler_with(Arc::new(FakeTracker::new()), "1.0.0");
    let range = RevisionRange::Range {
        previous: c0.to_string(),
        current: merge.to_string(),
    };
    let spec = assembler.assemble(&source, &range).await.unwrap();

    let shas: Vec<String> = spec.commits.iter().map(|c| c.sha.clone()).collect();
    assert!(!shas.contains(&merge.to_string()));
    assert!(shas.contains(&c1.to_string()));
    assert!(shas.contains(&side.to_string()));
}

#[tokio::test]
async fn test_release_commit_at_head_is_dropped() {
    let test_repo = TestRepo::new();
    let c0 = test_repo.commit("chore: init");
    let c1 = test_repo.commit("feat: add X");
    let c2 = test_repo.commit("release 1.0.0");
    let source = GitCommitSource::from_repository(test_repo.repo);

    let mut assembler = assembler_with(Arc::new(FakeTracker::new()), "1.1.0");
    let range = RevisionRange::Range {
        previous: c0.to_string(),
        current: c2.to_string(),
    };
    let spec = assembler.assemble(&source, &range).await.unwrap();

    let shas: Vec<String> = spec.commits.iter().map(|c| c.sha.clone()).collect();
    assert_eq!(shas, vec![c1.to_string()]);
}

#[tokio::test]
async fn test_empty_range_yields_empty_document() {
    let test_repo = TestRepo::new();
    let source = GitCommitSource::from_repository(test_repo.repo);

    let mut assembler = assembler_with(Arc::new(FakeTracker::new()), "v2.0.0");
    let spec = assembler
        .assemble(&source, &RevisionRange::Empty)
        .await
        .unwrap();

    // leading v is stripped from the recorded version
    assert_eq!(spec.version, "2.0.0");
    assert!(spec.commits.is_empty());
    assert!(spec.issues.is_empty());
    assert!(spec.pull_requests.is_empty());
}

#[tokio::test]
async fn test_commit_author_identity_comes_from_signature() {
    let test_repo = TestRepo::new();
    let c0 = test_repo.commit("chore: init");
    let c1 = test_repo.commit("feat: add X");
    let source = GitCommitSource::from_repository(test_repo.repo);

    let mut assembler = ChangelogAssembler::new(None, UserIdentityResolver::new(None), "1.0.0");
    let range = RevisionRange::Range {
        previous: c0.to_string(),
        current: c1.to_string(),
    };
    let spec = assembler.assemble(&source, &range).await.unwrap();

    let author = spec.commits[0].author.as_ref().unwrap();
    assert_eq!(author.login, "test");
    assert_eq!(author.name, "Test User");
    assert_eq!(author.email, "test@example.com");

    let committer = spec.commits[0].committer.as_ref().unwrap();
    assert_eq!(committer.login, author.login);
}
