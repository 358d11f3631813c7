use std::fs::File;
use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use anyhow::Result;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::Layer as _;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

/// Log file receiving every operational event.
pub const VERBOSE_LOG_FILE: &str = "watchman.log";

/// Log file receiving warnings and errors only.
pub const ERRORS_LOG_FILE: &str = "watchman_errors.log";

const DATE_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// Install the global subscriber: console output filtered by `RUST_LOG`, plus
/// the verbose and error log files in `log_dir`.
pub fn setup(log_dir: &Path) -> Result<()> {
    subscriber(log_dir)?.try_init()?;
    Ok(())
}

/// Build the layered subscriber without installing it.
fn subscriber(log_dir: &Path) -> Result<impl tracing::Subscriber + Send + Sync + 'static> {
    let verbose = open_log_file(
        &log_dir.join(VERBOSE_LOG_FILE),
        "Git Watchman everything log file",
    )?;
    let errors = open_log_file(
        &log_dir.join(ERRORS_LOG_FILE),
        "Git Watchman errors & fatals log file",
    )?;

    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env()?;
    let console = tracing_subscriber::fmt::layer()
        .with_timer(timer())
        .with_target(false)
        .with_writer(std::io::stdout)
        .with_filter(filter);

    let verbose = tracing_subscriber::fmt::layer()
        .with_timer(timer())
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(verbose))
        .with_filter(LevelFilter::INFO);

    let errors = tracing_subscriber::fmt::layer()
        .with_timer(timer())
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(errors))
        .with_filter(LevelFilter::WARN);

    Ok(tracing_subscriber::registry()
        .with(console)
        .with(verbose)
        .with(errors))
}

fn timer() -> tracing_subscriber::fmt::time::ChronoLocal {
    tracing_subscriber::fmt::time::ChronoLocal::new(DATE_FORMAT.into())
}

/// Open a log file for appending, writing a header if it is new.
pub fn open_log_file(path: &Path, title: &str) -> Result<File> {
    let is_new = !path.exists();
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    if is_new {
        let started = chrono::Local::now().format(DATE_FORMAT);
        write!(file, "{}\nStarted at {}\n\n", title, started)
            .with_context(|| format!("Failed to write log file {}", path.display()))?;
    }

    Ok(file)
}
