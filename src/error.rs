use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while turning status output into a change set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unrecognized status code '{code}' in line: {line}")]
    UnknownCode { code: char, line: String },

    #[error("malformed status line: {line}")]
    MalformedLine { line: String },
}

/// Errors that can occur while watching repositories.
///
/// Only configuration errors end a run. Everything else is scoped to the
/// repository being processed and is logged by the coordinator.
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("{}", describe_configuration(.path, .message))]
    Configuration {
        path: Option<PathBuf>,
        message: String,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("`{command}` failed: {message}")]
    CommandExecution { command: String, message: String },

    #[error("failed to send notification: {0}")]
    Notification(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type WatchResult<T> = Result<T, WatchError>;

impl WatchError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            path: None,
            message: message.into(),
        }
    }

    pub fn invalid_path(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Configuration {
            path: Some(path.into()),
            message: message.into(),
        }
    }

    /// Whether this error must abort the whole run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}

fn describe_configuration(path: &Option<PathBuf>, message: &str) -> String {
    match path {
        Some(path) => format!("configuration error: {}: {}", path.display(), message),
        None => format!("configuration error: {}", message),
    }
}
