use std::path::PathBuf;

use crate::clients::git::CommandRunner;
use crate::clients::git::args;
use crate::config::Defaults;
use crate::config::RepoConfig;
use crate::error::WatchError;
use crate::error::WatchResult;
use crate::status;
use crate::status::ChangeSet;

// -----------------------------------------------------------------------------
// Types

/// A monitored working tree, resolved and validated from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryDescriptor {
    /// Canonical absolute path of the working tree.
    pub path: PathBuf,
    pub name: String,
    pub from: Vec<String>,
    pub to: Vec<String>,
}

/// Where the working tree currently points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositorySummary {
    pub branch: String,
    pub commit_hash: String,
}

/// Parsed status, optionally with the raw output it came from.
#[derive(Debug, Clone)]
pub struct StatusSnapshot {
    pub raw: Option<String>,
    pub parsed: ChangeSet,
}

// -----------------------------------------------------------------------------
// RepositoryDescriptor impl

impl RepositoryDescriptor {
    /// Merge a repository entry with the defaults and check that it points at
    /// a git working tree.
    pub fn new(config: &RepoConfig, defaults: &Defaults) -> WatchResult<Self> {
        let path = std::fs::canonicalize(&config.path)
            .map_err(|e| WatchError::invalid_path(&config.path, e.to_string()))?;
        if !path.is_dir() {
            return Err(WatchError::invalid_path(path, "is not a directory"));
        }
        if !path.join(".git").is_dir() {
            return Err(WatchError::invalid_path(path, "is not a git repository"));
        }

        let from = config
            .from
            .as_ref()
            .filter(|addresses| !addresses.is_empty())
            .unwrap_or(&defaults.from)
            .to_vec();
        let to = config
            .to
            .as_ref()
            .filter(|addresses| !addresses.is_empty())
            .unwrap_or(&defaults.to)
            .to_vec();
        if from.is_empty() || to.is_empty() {
            return Err(WatchError::invalid_path(
                path,
                "no sender or recipient address configured",
            ));
        }

        let name = match &config.name {
            Some(name) => name.clone(),
            None => path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string()),
        };

        Ok(Self {
            path,
            name,
            from,
            to,
        })
    }

    /// Address used as the message sender.
    pub fn sender(&self) -> &str {
        &self.from[0]
    }

    pub async fn current_branch(&self, runner: &impl CommandRunner) -> WatchResult<String> {
        self.git(runner, &["name-rev", "--name-only", "HEAD"])
            .await
            .map(|out| out.trim().to_string())
    }

    pub async fn current_commit_hash(&self, runner: &impl CommandRunner) -> WatchResult<String> {
        self.git(runner, &["rev-parse", "HEAD"])
            .await
            .map(|out| out.trim().to_string())
    }

    pub async fn summary(&self, runner: &impl CommandRunner) -> WatchResult<RepositorySummary> {
        Ok(RepositorySummary {
            branch: self.current_branch(runner).await?,
            commit_hash: self.current_commit_hash(runner).await?,
        })
    }

    /// One-line log of the last `count` commits.
    pub async fn recent_log(
        &self,
        runner: &impl CommandRunner,
        count: usize,
    ) -> WatchResult<String> {
        let count = count.to_string();
        self.git(runner, &["log", "--oneline", "-n", &count])
            .await
            .map(|out| out.trim().to_string())
    }

    pub async fn changes(
        &self,
        runner: &impl CommandRunner,
        include_raw: bool,
    ) -> WatchResult<StatusSnapshot> {
        let raw = self.git(runner, &["status", "--porcelain"]).await?;
        let parsed = status::parse(&raw)?;
        Ok(StatusSnapshot {
            raw: include_raw.then_some(raw),
            parsed,
        })
    }

    async fn git(&self, runner: &impl CommandRunner, git_args: &[&str]) -> WatchResult<String> {
        runner.run(&self.path, "git", &args(git_args)).await
    }
}
