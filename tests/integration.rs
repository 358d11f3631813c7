//! cargo test --test integration -- --nocapture

mod utils;

use std::path::Path;
use std::sync::LazyLock;

use git_watchman::App;
use git_watchman::Config;
use git_watchman::RunOptions;
use git_watchman::clients::git::GitCli;
use git_watchman::clients::sendmail::MemoryNotifier;
use git_watchman::commands::check::RunSummary;
use git_watchman::journal::MemoryJournal;
use git_watchman::journal::Severity;
use git_watchman::queue::RepositoryQueue;

// Normalize hashes and timestamps
static INSTA_FILTERS: LazyLock<Vec<(&'static str, &'static str)>> = LazyLock::new(|| {
    vec![
        // Full or abbreviated commit hash
        (r"\b[0-9a-f]{7,40}\b", "[HASH]"),
        // Report timestamp
        (r"Current time: .+", "Current time: [TIME]"),
    ]
});

#[ctor::ctor]
fn init() {
    // Disable colors for all integration tests to get clean output
    colored::control::set_override(false);
}

/// Creates a clean repository and a repository with staged, unstaged and
/// untracked changes, and writes a config listing both.
async fn setup(root: &Path) -> anyhow::Result<Config> {
    let clean = root.join("docs");
    utils::create_git_repo(&clean).await?;
    utils::create_commit(&clean, "Initial commit", "index.md", "# Docs\n").await?;

    let website = root.join("website");
    utils::create_git_repo(&website).await?;
    utils::create_commit(&website, "Initial commit", "README.md", "hello\n").await?;
    utils::write_file(&website, "README.md", "hello, world\n").await?;
    utils::write_file(&website, "src/new.rs", "fn main() {}\n").await?;
    utils::stage(&website, "src/new.rs").await?;
    utils::write_file(&website, "notes.txt", "todo\n").await?;

    let config = serde_json::json!({
        "defaults": {
            "from": "watchman@example.com",
            "to": ["ops@example.com"]
        },
        "repos": [
            { "path": clean, "name": "docs" },
            { "path": website, "name": "website", "to": "web@example.com" }
        ]
    });
    let config_path = root.join("watchman.json");
    tokio::fs::write(&config_path, serde_json::to_string_pretty(&config)?).await?;

    Ok(Config::load(&config_path)?)
}

fn app(config: &Config) -> App<GitCli, MemoryNotifier, MemoryJournal> {
    let options = RunOptions {
        sender_host: Some("test-host".to_string()),
        ..RunOptions::from_config(config)
    };
    App::new(GitCli, MemoryNotifier::new(), MemoryJournal::new(), options)
}

fn queue(config: &Config) -> anyhow::Result<RepositoryQueue> {
    let mut queue = RepositoryQueue::new(config.defaults.clone())?;
    queue.refill(&config.repos)?;
    Ok(queue)
}

#[tokio::test]
async fn test_check_reports_dirty_repository() -> anyhow::Result<()> {
    let test_dir = utils::TestDir::new()?;
    let config = setup(test_dir.path()).await?;
    let mut queue = queue(&config)?;
    let app = app(&config);

    let run = app.cmd_check(&mut queue).await;
    assert_eq!(
        run,
        RunSummary {
            queued: 2,
            clean: 1,
            notified: 1,
            failed: 0,
        }
    );

    let sent = app.notifier.sent.borrow();
    assert_eq!(sent.len(), 1);
    let notification = &sent[0];
    assert_eq!(notification.to, vec!["web@example.com"]);
    assert_eq!(notification.from, "watchman@example.com");
    assert_eq!(
        notification.subject,
        "⚠ website: 3 modified, added, untracked file(s)"
    );

    assert_snapshot_filtered!(notification.body.trim_end(), INSTA_FILTERS, @r"
    Hey! I found 3 uncommitted change(s) in git status of website.

    SUMMARY:
      Branch: main
      Hash: [HASH]
      Current time: [TIME]

    MODIFIED:
      README.md

    ADDED:
      src/new.rs

    UNTRACKED:
      notes.txt

    LAST COMMITS:
    [HASH] Initial commit

    Raw git status output (quoted):
    >  M README.md
    > A  src/new.rs
    > ?? notes.txt

    Yours,
    Watchman
    test-host
    ");

    let verbose = app.journal.messages(Severity::Verbose);
    assert_eq!(
        verbose,
        vec![
            "Started with 2 checks queued.",
            "Processing docs...",
            "No changes in docs.",
            "Processing website...",
            "3 changes found, message sent.",
            "Completed: 1 clean, 1 notified, 0 failed.",
        ]
    );
    assert!(app.journal.messages(Severity::Error).is_empty());

    Ok(())
}

#[tokio::test]
async fn test_status_lists_every_repository() -> anyhow::Result<()> {
    let test_dir = utils::TestDir::new()?;
    let config = setup(test_dir.path()).await?;
    let mut queue = queue(&config)?;
    let app = app(&config);

    let mut out = Vec::new();
    app.cmd_status(&mut queue, &mut out).await?;
    insta::assert_snapshot!(String::from_utf8(out)?, @r"
    ✓ docs (main)
    ⚠ website: 3 modified, added, untracked file(s)
    ");
    assert!(app.notifier.sent.borrow().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_invalid_repository_aborts_before_processing() -> anyhow::Result<()> {
    let test_dir = utils::TestDir::new()?;
    let plain_dir = test_dir.path().join("not-a-repo");
    tokio::fs::create_dir_all(&plain_dir).await?;

    let config = Config::from_json(
        &serde_json::json!({
            "defaults": { "from": "watchman@example.com", "to": "ops@example.com" },
            "repos": [ { "path": plain_dir } ]
        })
        .to_string(),
    )?;

    let err = queue(&config).unwrap_err();
    assert!(err.to_string().contains("is not a git repository"));

    Ok(())
}

#[tokio::test]
async fn test_commit_with_clean_tree_sends_nothing() -> anyhow::Result<()> {
    let test_dir = utils::TestDir::new()?;
    let config = setup(test_dir.path()).await?;

    // Commit everything in the dirty repository
    let website = test_dir.path().join("website");
    utils::stage(&website, ".").await?;
    utils::create_commit(&website, "Second commit", "notes.txt", "done\n").await?;

    let mut queue = queue(&config)?;
    let app = app(&config);

    let run = app.cmd_check(&mut queue).await;
    assert_eq!(run.clean, 2);
    assert_eq!(run.notified, 0);
    assert!(app.notifier.sent.borrow().is_empty());
    assert_eq!(
        app.journal
            .messages(Severity::Verbose)
            .iter()
            .filter(|m| m.starts_with("Processing "))
            .count(),
        2
    );

    Ok(())
}
