use std::path::Path;

use crate::clients::git::CommandRunner;
use crate::clients::sendmail::Notifier;
use crate::config::Config;
use crate::config::DEFAULT_LOG_ENTRIES;
use crate::error::WatchResult;
use crate::journal::Journal;
use crate::report::RunRecord;
use crate::repository::RepositoryDescriptor;

/// Host name used in report signatures when none can be determined.
pub const FALLBACK_HOST: &str = "localhost";

pub struct App<G, N, J> {
    pub runner: G,
    pub notifier: N,
    pub journal: J,
    pub options: RunOptions,
}

/// Settings that apply to every repository in a run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Number of recent commits listed in reports.
    pub log_entries: usize,
    /// Host named in report signatures; looked up with `hostname` if unset.
    pub sender_host: Option<String>,
}

impl RunOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            log_entries: config.log_entries,
            sender_host: None,
        }
    }
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            log_entries: DEFAULT_LOG_ENTRIES,
            sender_host: None,
        }
    }
}

impl<G: CommandRunner, N: Notifier, J: Journal> App<G, N, J> {
    pub fn new(runner: G, notifier: N, journal: J, options: RunOptions) -> Self {
        Self {
            runner,
            notifier,
            journal,
            options,
        }
    }
}

/// Shared helper methods for App
impl<G: CommandRunner, N: Notifier, J: Journal> App<G, N, J> {
    /// Collect everything a report needs, or `None` if the tree is clean.
    ///
    /// Status is read first so clean repositories cost a single command.
    pub(crate) async fn inspect<'a>(
        &self,
        repository: &'a RepositoryDescriptor,
    ) -> WatchResult<Option<RunRecord<'a>>> {
        let snapshot = repository.changes(&self.runner, true).await?;
        if snapshot.parsed.is_empty() {
            return Ok(None);
        }

        let summary = repository.summary(&self.runner).await?;
        let recent_log = repository
            .recent_log(&self.runner, self.options.log_entries)
            .await?;

        Ok(Some(RunRecord::new(
            repository,
            snapshot.parsed,
            summary,
            recent_log,
            snapshot.raw.unwrap_or_default(),
        )))
    }

    /// Resolve the host named in report signatures.
    pub(crate) async fn sender_host(&self) -> String {
        if let Some(host) = &self.options.sender_host {
            return host.clone();
        }

        match self.runner.run(Path::new("."), "hostname", &[]).await {
            Ok(host) if !host.trim().is_empty() => host.trim().to_string(),
            Ok(_) => FALLBACK_HOST.to_string(),
            Err(e) => {
                self.journal.warning(&format!(
                    "Cannot determine host name, using {}: {}",
                    FALLBACK_HOST, e
                ));
                FALLBACK_HOST.to_string()
            }
        }
    }
}
