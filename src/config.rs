use std::ffi::OsString;
use std::path::PathBuf;

use crate::cli::GlobalArgs;

pub const DATA_DIR_NAME: &str = ".trackflow";
pub const LOG_FILE_NAME: &str = "trackflow.log";

/// Settings resolved once at startup from flags and environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub log_level: String,
    pub log_to_console: bool,
}

impl Config {
    /// `console_allowed` is false while the terminal UI owns the screen.
    pub fn from_args(args: &GlobalArgs, console_allowed: bool) -> Self {
        let data_dir = args
            .data_dir
            .clone()
            .unwrap_or_else(|| default_data_dir(std::env::var_os("HOME")));
        Self {
            data_dir,
            log_level: args.log_level.clone(),
            log_to_console: args.verbose && console_allowed,
        }
    }

    pub fn log_file(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE_NAME)
    }
}

pub fn default_data_dir(home: Option<OsString>) -> PathBuf {
    match home {
        Some(home) if !home.is_empty() => PathBuf::from(home).join(DATA_DIR_NAME),
        _ => PathBuf::from(DATA_DIR_NAME),
    }
}
