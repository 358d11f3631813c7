use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use clap::Subcommand;
use git_watchman::App;
use git_watchman::Config;
use git_watchman::RunOptions;
use git_watchman::clients::git::GitCli;
use git_watchman::clients::sendmail::DEFAULT_SENDMAIL;
use git_watchman::clients::sendmail::DryRun;
use git_watchman::clients::sendmail::Notifier;
use git_watchman::clients::sendmail::Sendmail;
use git_watchman::error::WatchResult;
use git_watchman::journal::Journal as _;
use git_watchman::journal::TracingJournal;
use git_watchman::logging;
use git_watchman::queue::RepositoryQueue;

/// Exit status when at least one repository could not be checked.
const PARTIAL_FAILURE: u8 = 2;

#[derive(Parser)]
#[command(name = "git-watchman")]
#[command(about = "Watch git working trees and mail a report when they have uncommitted changes", long_about = None)]
pub struct Cli {
    /// Configuration file
    #[arg(short, long, global = true, default_value = "watchman.json")]
    pub config: PathBuf,

    /// Directory for watchman.log and watchman_errors.log
    #[arg(long, global = true, default_value = ".")]
    pub log_dir: PathBuf,

    /// sendmail-compatible binary used to deliver reports
    #[arg(long, global = true, default_value = DEFAULT_SENDMAIL)]
    pub sendmail: PathBuf,

    /// Print reports to stdout instead of sending them
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Host name to sign reports with (defaults to `hostname`)
    #[arg(long, global = true)]
    pub host: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check every repository and mail a report for each one with changes
    Check,
    /// Show a one-line summary per repository without sending anything
    Status,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::setup(&cli.log_dir)?;

    let (config, queue) = match load(&cli) {
        Ok(loaded) => loaded,
        Err(e) => {
            TracingJournal.fatal(&e.to_string());
            return Ok(ExitCode::FAILURE);
        }
    };

    let options = RunOptions {
        sender_host: cli.host.clone(),
        ..RunOptions::from_config(&config)
    };

    if cli.dry_run {
        run(&cli, queue, options, DryRun::stdout()).await
    } else {
        run(&cli, queue, options, Sendmail::new(&cli.sendmail)).await
    }
}

fn load(cli: &Cli) -> WatchResult<(Config, RepositoryQueue)> {
    let config = Config::load(&cli.config)?;
    let mut queue = RepositoryQueue::new(config.defaults.clone())?;
    queue.refill(&config.repos)?;
    Ok((config, queue))
}

async fn run<N: Notifier>(
    cli: &Cli,
    mut queue: RepositoryQueue,
    options: RunOptions,
    notifier: N,
) -> Result<ExitCode> {
    let app = App::new(GitCli, notifier, TracingJournal, options);

    match cli.command {
        Some(Commands::Check) | None => {
            let run = app.cmd_check(&mut queue).await;
            if run.failed > 0 {
                return Ok(ExitCode::from(PARTIAL_FAILURE));
            }
        }
        Some(Commands::Status) => app.cmd_status(&mut queue, &mut std::io::stdout()).await?,
    }

    Ok(ExitCode::SUCCESS)
}
