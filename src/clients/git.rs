#![allow(async_fn_in_trait)]

use std::path::Path;

use log::debug;
#[cfg(test)]
use mockall::automock;
use tokio::process::Command;

use crate::error::WatchError;
use crate::error::WatchResult;

// -----------------------------------------------------------------------------
// CommandRunner trait

/// Runs external commands inside a working directory and captures stdout.
///
/// The directory only applies to the spawned process; the watchman's own
/// working directory is never changed.
#[cfg_attr(test, automock)]
pub trait CommandRunner {
    async fn run(&self, dir: &Path, program: &str, args: &[String]) -> WatchResult<String>;
}

// -----------------------------------------------------------------------------
// GitCli

/// Real implementation that spawns processes on the host.
pub struct GitCli;

impl CommandRunner for GitCli {
    async fn run(&self, dir: &Path, program: &str, args: &[String]) -> WatchResult<String> {
        let command = format!("{} {}", program, args.join(" "));
        debug!("Running `{}` in {}", command, dir.display());

        let output = Command::new(program)
            .current_dir(dir)
            .args(args)
            .output()
            .await
            .map_err(|e| WatchError::CommandExecution {
                command: command.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(WatchError::CommandExecution {
                command,
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|e| WatchError::CommandExecution {
            command,
            message: e.to_string(),
        })
    }
}

/// Build an owned argument list from string literals.
pub fn args(args: &[&str]) -> Vec<String> {
    args.iter().map(|arg| arg.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_runs_in_given_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "").unwrap();

        let output = GitCli.run(dir.path(), "ls", &args(&[])).await.unwrap();
        assert!(output.contains("marker.txt"));
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_command_error() {
        let dir = tempfile::tempdir().unwrap();

        let err = GitCli
            .run(dir.path(), "git", &args(&["rev-parse", "HEAD"]))
            .await
            .unwrap_err();
        assert!(matches!(err, WatchError::CommandExecution { .. }));
        assert!(err.to_string().starts_with("`git rev-parse HEAD` failed"));
    }

    #[tokio::test]
    async fn test_missing_program_is_command_error() {
        let dir = tempfile::tempdir().unwrap();

        let err = GitCli
            .run(dir.path(), "definitely-not-a-real-binary", &args(&[]))
            .await
            .unwrap_err();
        assert!(matches!(err, WatchError::CommandExecution { .. }));
    }
}
