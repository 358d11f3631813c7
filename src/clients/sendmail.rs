#![allow(async_fn_in_trait)]

use std::cell::RefCell;
use std::io::Write;
use std::path::PathBuf;
use std::process::Stdio;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use log::debug;
#[cfg(test)]
use mockall::automock;
use tokio::io::AsyncWriteExt as _;
use tokio::process::Command;

use crate::error::WatchError;
use crate::error::WatchResult;

/// Default location of the sendmail-compatible binary.
pub const DEFAULT_SENDMAIL: &str = "/usr/sbin/sendmail";

// -----------------------------------------------------------------------------
// Types

/// A message ready to hand to a mail transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub to: Vec<String>,
    pub from: String,
    pub subject: String,
    pub body: String,
}

/// Delivers notifications.
#[cfg_attr(test, automock)]
pub trait Notifier {
    async fn send(&self, notification: &Notification) -> WatchResult<()>;
}

/// Pipes messages to a local `sendmail -t -i`.
pub struct Sendmail {
    program: PathBuf,
}

/// Writes messages to a local writer (stdout by default) instead of sending
/// them. Line endings are LF so the output reads like a terminal listing.
pub struct DryRun<W = std::io::Stdout> {
    out: RefCell<W>,
}

// -----------------------------------------------------------------------------
// Notification impl

impl Notification {
    /// Render as an RFC 5322 message with a plain UTF-8 body.
    pub fn to_message(&self) -> String {
        let mut message = String::new();
        message.push_str(&format!("To: {}\r\n", self.to.join(", ")));
        message.push_str(&format!("From: {}\r\n", self.from));
        message.push_str(&format!("Subject: {}\r\n", encode_header(&self.subject)));
        message.push_str("X-Mailer: Git Watchman\r\n");
        message.push_str("MIME-Version: 1.0\r\n");
        message.push_str("Content-Type: text/plain; charset=utf-8\r\n");
        message.push_str("Content-Transfer-Encoding: 8bit\r\n");
        message.push_str("\r\n");
        message.push_str(&self.body);
        message
    }
}

/// RFC 2047 encode a header value if it is not plain ASCII.
fn encode_header(value: &str) -> String {
    if value.is_ascii() {
        value.to_string()
    } else {
        format!("=?UTF-8?B?{}?=", STANDARD.encode(value))
    }
}

// -----------------------------------------------------------------------------
// Sendmail impl

impl Sendmail {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Notifier for Sendmail {
    async fn send(&self, notification: &Notification) -> WatchResult<()> {
        debug!(
            "Sending '{}' to {} via {}",
            notification.subject,
            notification.to.join(", "),
            self.program.display()
        );

        let mut child = Command::new(&self.program)
            .args(["-t", "-i"])
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                WatchError::Notification(format!("cannot run {}: {}", self.program.display(), e))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(notification.to_message().as_bytes())
                .await
                .map_err(|e| WatchError::Notification(e.to_string()))?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| WatchError::Notification(e.to_string()))?;

        if !output.status.success() {
            return Err(WatchError::Notification(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(())
    }
}

// -----------------------------------------------------------------------------
// DryRun impl

impl DryRun {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> DryRun<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: RefCell::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl<W: Write> Notifier for DryRun<W> {
    async fn send(&self, notification: &Notification) -> WatchResult<()> {
        let message = notification.to_message().replace("\r\n", "\n");
        let mut out = self.out.borrow_mut();
        writeln!(out, "{}", message)?;
        out.flush()?;
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// MemoryNotifier

/// Keeps sent notifications in memory. Addresses listed in `rejected` fail.
#[derive(Default)]
pub struct MemoryNotifier {
    pub sent: std::cell::RefCell<Vec<Notification>>,
    pub rejected: Vec<String>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting(address: &str) -> Self {
        Self {
            sent: Default::default(),
            rejected: vec![address.to_string()],
        }
    }
}

impl Notifier for MemoryNotifier {
    async fn send(&self, notification: &Notification) -> WatchResult<()> {
        if let Some(address) = notification
            .to
            .iter()
            .find(|address| self.rejected.contains(*address))
        {
            return Err(WatchError::Notification(format!(
                "recipient rejected: {}",
                address
            )));
        }
        self.sent.borrow_mut().push(notification.clone());
        Ok(())
    }
}
