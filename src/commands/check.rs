use crate::App;
use crate::clients::git::CommandRunner;
use crate::clients::sendmail::Notification;
use crate::clients::sendmail::Notifier;
use crate::error::WatchResult;
use crate::journal::Journal;
use crate::queue::RepositoryQueue;
use crate::report::ReportBuilder;
use crate::repository::RepositoryDescriptor;

/// Aggregate outcome of one pass over the queue.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub queued: usize,
    pub clean: usize,
    pub notified: usize,
    pub failed: usize,
}

enum Outcome {
    Clean,
    Notified { total_changes: usize },
}

impl<G: CommandRunner, N: Notifier, J: Journal> App<G, N, J> {
    /// Check every queued repository and send a report for each dirty one.
    ///
    /// Repositories are handled one at a time in queue order. A failure in one
    /// repository is recorded and the run moves on to the next.
    pub async fn cmd_check(&self, queue: &mut RepositoryQueue) -> RunSummary {
        let mut run = RunSummary {
            queued: queue.len(),
            ..RunSummary::default()
        };
        self.journal
            .verbose(&format!("Started with {} checks queued.", queue.len()));

        let builder = ReportBuilder::new(self.sender_host().await);

        while let Some(repository) = queue.current() {
            self.journal
                .verbose(&format!("Processing {}...", repository.name));

            match self.check_repository(repository, &builder).await {
                Ok(Outcome::Clean) => {
                    self.journal
                        .verbose(&format!("No changes in {}.", repository.name));
                    run.clean += 1;
                }
                Ok(Outcome::Notified { total_changes }) => {
                    self.journal.verbose(&format!(
                        "{} changes found, message sent.",
                        total_changes
                    ));
                    run.notified += 1;
                }
                Err(e) => {
                    self.journal
                        .error(&format!("Skipping {}: {}", repository.name, e));
                    run.failed += 1;
                }
            }

            queue.advance();
        }

        self.journal.verbose(&format!(
            "Completed: {} clean, {} notified, {} failed.",
            run.clean, run.notified, run.failed
        ));
        run
    }

    async fn check_repository(
        &self,
        repository: &RepositoryDescriptor,
        builder: &ReportBuilder,
    ) -> WatchResult<Outcome> {
        let Some(record) = self.inspect(repository).await? else {
            return Ok(Outcome::Clean);
        };

        let report = builder.build(&record);
        let notification = Notification {
            to: repository.to.clone(),
            from: repository.sender().to_string(),
            subject: report.subject,
            body: report.body,
        };
        self.notifier.send(&notification).await?;

        Ok(Outcome::Notified {
            total_changes: record.total_changes,
        })
    }
}
