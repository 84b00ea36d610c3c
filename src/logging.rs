use std::fs::{self, OpenOptions};
use std::io;
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::core::error::TrackError;

/// Installs the global subscriber: an append-only log file in the data
/// directory, plus stderr when the config asks for it.
pub fn init(config: &Config) -> Result<(), TrackError> {
    let log_path = config.log_file();
    let storage_err = |source| TrackError::Storage {
        key: log_path.display().to_string(),
        source,
    };
    fs::create_dir_all(&config.data_dir).map_err(storage_err)?;
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .map_err(storage_err)?;

    let file_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(Mutex::new(log_file));

    let console_layer = config.log_to_console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(io::stderr)
    });

    tracing_subscriber::registry()
        .with(build_env_filter(&config.log_level)?)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| TrackError::Logging {
            message: e.to_string(),
        })?;

    tracing::debug!(file = %log_path.display(), level = %config.log_level, "logging initialized");
    Ok(())
}

fn build_env_filter(level: &str) -> Result<EnvFilter, TrackError> {
    let directives = [level, "crossterm=warn", "ratatui=warn"].join(",");
    EnvFilter::try_new(&directives).map_err(|e| TrackError::Logging {
        message: format!("invalid log filter '{directives}': {e}"),
    })
}
