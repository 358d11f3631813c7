//! Operational log of a watch run.
//!
//! Components never log from inside error values; they hold a [`Journal`] and
//! record events at the point where an outcome is known.

use std::fmt::Display;

use tracing::error;
use tracing::info;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Verbose,
    Warning,
    Error,
    Fatal,
}

impl Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Verbose => f.write_str("VERBOSE"),
            Self::Warning => f.write_str("WARNING"),
            Self::Error => f.write_str("ERROR"),
            Self::Fatal => f.write_str("FATAL"),
        }
    }
}

pub trait Journal {
    fn record(&self, severity: Severity, message: &str);

    fn verbose(&self, message: &str) {
        self.record(Severity::Verbose, message);
    }

    fn warning(&self, message: &str) {
        self.record(Severity::Warning, message);
    }

    fn error(&self, message: &str) {
        self.record(Severity::Error, message);
    }

    fn fatal(&self, message: &str) {
        self.record(Severity::Fatal, message);
    }
}

/// Journal that forwards to `tracing`, where the subscriber set up in
/// [`crate::logging`] routes events to the console and the log files.
pub struct TracingJournal;

impl Journal for TracingJournal {
    fn record(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Verbose => info!("{}", message),
            Severity::Warning => warn!("{}", message),
            Severity::Error => error!("{}", message),
            Severity::Fatal => error!(fatal = true, "{}", message),
        }
    }
}

/// Journal that keeps events in memory, for inspecting a run afterwards.
#[derive(Default)]
pub struct MemoryJournal {
    pub events: std::cell::RefCell<Vec<(Severity, String)>>,
}

impl MemoryJournal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages recorded at `severity`, in order.
    pub fn messages(&self, severity: Severity) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter(|(s, _)| *s == severity)
            .map(|(_, message)| message.clone())
            .collect()
    }
}

impl Journal for MemoryJournal {
    fn record(&self, severity: Severity, message: &str) {
        self.events
            .borrow_mut()
            .push((severity, message.to_string()));
    }
}
