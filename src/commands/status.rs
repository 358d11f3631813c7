use anyhow::Result;
use colored::Colorize;

use crate::App;
use crate::clients::git::CommandRunner;
use crate::clients::sendmail::Notifier;
use crate::error::WatchResult;
use crate::journal::Journal;
use crate::queue::RepositoryQueue;
use crate::report;
use crate::repository::RepositoryDescriptor;

impl<G: CommandRunner, N: Notifier, J: Journal> App<G, N, J> {
    /// Print one line per queued repository without sending anything.
    pub async fn cmd_status(
        &self,
        queue: &mut RepositoryQueue,
        stdout: &mut impl std::io::Write,
    ) -> Result<()> {
        while let Some(repository) = queue.current() {
            match self.status_line(repository).await {
                Ok(line) => writeln!(stdout, "{}", line)?,
                Err(e) => writeln!(stdout, "{} {}: {}", "✗".red(), repository.name, e)?,
            }
            queue.advance();
        }
        Ok(())
    }

    async fn status_line(&self, repository: &RepositoryDescriptor) -> WatchResult<String> {
        if let Some(record) = self.inspect(repository).await? {
            let line = report::subject(&repository.name, &record.changes);
            return Ok(line.yellow().to_string());
        }

        let branch = repository.current_branch(&self.runner).await?;
        Ok(format!(
            "{} {} {}",
            "✓".green(),
            repository.name,
            format!("({})", branch).dimmed()
        ))
    }
}
