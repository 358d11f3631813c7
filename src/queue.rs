use crate::config::Defaults;
use crate::config::RepoConfig;
use crate::error::WatchResult;
use crate::repository::RepositoryDescriptor;

/// Repositories to check in one run, consumed front to back exactly once.
#[derive(Debug)]
pub struct RepositoryQueue {
    defaults: Defaults,
    repositories: Vec<RepositoryDescriptor>,
    cursor: usize,
}

impl RepositoryQueue {
    /// Create an empty queue. Fails if the defaults cannot fill in a sender
    /// and a recipient.
    pub fn new(defaults: Defaults) -> WatchResult<Self> {
        defaults.validate()?;
        Ok(Self {
            defaults,
            repositories: Vec::new(),
            cursor: 0,
        })
    }

    /// Replace the contents with one descriptor per entry and rewind.
    ///
    /// Any invalid entry fails the whole refill and leaves the queue untouched.
    pub fn refill(&mut self, configs: &[RepoConfig]) -> WatchResult<()> {
        let repositories = configs
            .iter()
            .map(|config| RepositoryDescriptor::new(config, &self.defaults))
            .collect::<WatchResult<Vec<_>>>()?;

        self.repositories = repositories;
        self.cursor = 0;
        Ok(())
    }

    pub fn current(&self) -> Option<&RepositoryDescriptor> {
        self.repositories.get(self.cursor)
    }

    pub fn advance(&mut self) {
        if self.cursor < self.repositories.len() {
            self.cursor += 1;
        }
    }

    pub fn has_more(&self) -> bool {
        self.cursor < self.repositories.len()
    }

    /// Total number of queued repositories, consumed or not.
    pub fn len(&self) -> usize {
        self.repositories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }
}
