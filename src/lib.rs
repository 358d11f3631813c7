pub mod clients;
pub mod commands;
pub mod config;
pub mod error;
pub mod journal;
pub mod logging;
pub mod queue;
pub mod report;
pub mod repository;
pub mod status;

mod app;

// Re-export App and Config from modules
pub use app::App;
pub use app::RunOptions;
pub use config::Config;

// Disable colors for all tests to get clean output
#[cfg(test)]
#[ctor::ctor]
fn init_tests() {
    colored::control::set_override(false);
}
