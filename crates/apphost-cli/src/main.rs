use apphost_core::settings::{self, SettingsStore};
use apphost_core::{config, logging};
use clap::Parser;

mod cli;

use crate::cli::Cli;

/// Log level from the `log.level` setting, `info` if it cannot be read.
fn configured_log_level(state_dir: &std::path::Path) -> String {
    SettingsStore::new(state_dir)
        .get(settings::LOG_LEVEL)
        .ok()
        .and_then(|entry| entry.value.as_str().map(str::to_string))
        .unwrap_or_else(|| "info".to_string())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging as early as possible; fall back to stderr.
    match config::load_or_init().and_then(|cfg| cfg.state_dir()) {
        Ok(state_dir) => {
            let level = configured_log_level(&state_dir);
            if let Err(e) = logging::init_logging(&state_dir, &level) {
                logging::init_logging_stderr(&level);
                tracing::warn!("file logging unavailable, using stderr: {:#}", e);
            }
        }
        Err(e) => {
            logging::init_logging_stderr("info");
            tracing::warn!("could not resolve state directory: {:#}", e);
        }
    }

    if let Err(err) = cli.run().await {
        eprintln!("apphost error: {:#}", err);
        std::process::exit(1);
    }
}
