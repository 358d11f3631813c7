//! Top-level commands exposed by the CLI, implemented as methods on [`crate::App`].
//!
//! - [`check`]: Inspect every repository and send reports for dirty ones
//! - [`status`]: Print a one-line summary per repository

pub mod check;
pub mod status;
