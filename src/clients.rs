//! Integration layers for the external programs the watchman drives.
//!
//! - [`git`]: Runs `git` (and other helpers) inside a repository's working tree
//! - [`sendmail`]: Hands finished reports to a local mail transport
//!
//! Each submodule provides a trait with real and in-memory implementations
//! to support both production use and testing.

pub mod git;
pub mod sendmail;
