use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::WatchError;
use crate::error::WatchResult;

/// Number of recent commits listed in a report unless configured otherwise.
pub const DEFAULT_LOG_ENTRIES: usize = 5;

/// Decoded `watchman.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub defaults: Defaults,
    #[serde(default)]
    pub repos: Vec<RepoConfig>,
    #[serde(default = "default_log_entries")]
    pub log_entries: usize,
}

/// Process-wide fallbacks for fields a repository entry leaves out.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Defaults {
    #[serde(default)]
    pub from: Addresses,
    #[serde(default)]
    pub to: Addresses,
}

/// One monitored repository as written in the configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoConfig {
    pub path: PathBuf,
    pub name: Option<String>,
    pub from: Option<Addresses>,
    pub to: Option<Addresses>,
}

/// One address or a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Addresses {
    One(String),
    Many(Vec<String>),
}

fn default_log_entries() -> usize {
    DEFAULT_LOG_ENTRIES
}

impl Config {
    /// Load config from a JSON file
    pub fn load(path: &Path) -> WatchResult<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| WatchError::invalid_path(path, format!("cannot read: {}", e)))?;
        Self::from_json(&contents).map_err(|e| match e {
            WatchError::Configuration { path: None, message } => {
                WatchError::invalid_path(path, message)
            }
            other => other,
        })
    }

    pub fn from_json(contents: &str) -> WatchResult<Self> {
        let config: Self = serde_json::from_str(contents)
            .map_err(|e| WatchError::configuration(format!("invalid JSON: {}", e)))?;
        config.defaults.validate()?;
        Ok(config)
    }
}

impl Defaults {
    pub fn new(from: Addresses, to: Addresses) -> Self {
        Self { from, to }
    }

    /// Both address lists must be usable before any repository is queued.
    pub fn validate(&self) -> WatchResult<()> {
        if self.from.is_empty() || self.to.is_empty() {
            return Err(WatchError::configuration(
                "defaults are wrong: both `from` and `to` need at least one address",
            ));
        }
        Ok(())
    }
}

impl RepoConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            name: None,
            from: None,
            to: None,
        }
    }
}

impl Addresses {
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            Self::One(address) => vec![address.clone()],
            Self::Many(addresses) => addresses.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::One(address) => address.trim().is_empty(),
            Self::Many(addresses) => addresses.iter().all(|a| a.trim().is_empty()),
        }
    }
}

impl Default for Addresses {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl From<&str> for Addresses {
    fn from(address: &str) -> Self {
        Self::One(address.to_string())
    }
}
