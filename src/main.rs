//! annalist - CLI entry point.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use annalist::commit::CommitGroupRegistry;
use annalist::git::{GitCommitSource, RevisionRange, resolve_range};
use annalist::issues::{IssueTracker, JiraTracker};
use annalist::release::{ChangelogAssembler, render_markdown, release_yaml, write_release_yaml};
use annalist::users::{GithubUserDirectory, ScmUserDirectory, UserIdentityResolver, get_github_token};

/// Assemble a structured release changelog from git history and an issue tracker.
#[derive(Parser, Debug)]
#[command(name = "annalist")]
#[command(about = "Assemble a structured release changelog from git history and an issue tracker")]
#[command(version)]
struct Cli {
    /// Path to the git repository
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// Version recorded in the release document
    #[arg(long = "set-version", default_value = "")]
    version: String,

    /// Path of the release YAML document
    #[arg(short = 'o', long, default_value = "release.yaml")]
    output: PathBuf,

    /// Optional path for a rendered markdown view
    #[arg(long)]
    markdown: Option<PathBuf>,

    /// Jira server URL
    #[arg(long, env = "JIRA_URL")]
    jira_url: Option<String>,

    /// Jira username
    #[arg(long, env = "JIRA_USER")]
    jira_user: Option<String>,

    /// Jira API token
    #[arg(long, env = "JIRA_API_TOKEN", hide_env_values = true)]
    jira_token: Option<String>,

    /// Skip SCM user-directory enrichment
    #[arg(long)]
    no_users: bool,

    /// Dry run - print the release document without writing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // Step 1: Open the repository and resolve the release interval
    let source = GitCommitSource::open(&cli.dir)
        .context("Not a git repository. Point --dir at a git repository.")?;

    let range = resolve_range(&source).context("Failed to resolve revision range")?;
    match &range {
        RevisionRange::Range { previous, current } => {
            println!("Generating changelog from git ref {} => {}", previous, current);
        }
        RevisionRange::Empty => {
            println!("No previous commit version found so change diff unavailable");
        }
    }

    // Step 2: Build the collaborators
    let tracker: Option<Arc<dyn IssueTracker>> =
        match (&cli.jira_url, &cli.jira_user, &cli.jira_token) {
            (Some(url), Some(user), Some(token)) => {
                Some(Arc::new(JiraTracker::new(url, user, token)))
            }
            (None, None, None) => None,
            _ => bail!(
                "Jira configuration is incomplete: --jira-url, --jira-user and --jira-token must be set together"
            ),
        };

    let directory: Option<Arc<dyn ScmUserDirectory>> = if cli.no_users {
        None
    } else {
        match get_github_token() {
            Ok(token) => Some(Arc::new(
                GithubUserDirectory::from_token(&token).context("Failed to build SCM client")?,
            )),
            Err(e) => {
                eprintln!("Warning: {}. Continuing without user enrichment.", e);
                None
            }
        }
    };

    // Step 3: Assemble the release document
    let resolver = UserIdentityResolver::new(directory);
    let mut assembler = ChangelogAssembler::new(tracker, resolver, &cli.version);
    let spec = assembler
        .assemble(&source, &range)
        .await
        .context("Failed to assemble changelog")?;

    println!(
        "Found {} commits, {} issues, {} pull requests",
        spec.commits.len(),
        spec.issues.len(),
        spec.pull_requests.len()
    );

    // Step 4: Write or display the document
    if cli.dry_run {
        println!("\n--- Dry Run Output ---\n");
        println!("{}", release_yaml(&spec)?);
    } else {
        write_release_yaml(&cli.output, &spec).context("Failed to write release document")?;
        println!("generated: {}", cli.output.display());
    }

    if let Some(md_path) = &cli.markdown {
        let registry = CommitGroupRegistry::conventional();
        let rendered = render_markdown(&spec, &registry);
        std::fs::write(md_path, rendered).context("Failed to write markdown view")?;
        println!("generated: {}", md_path.display());
    }

    Ok(())
}
