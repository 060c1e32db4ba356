use std::path::PathBuf;
use std::time::Duration;

use automail_core::config::{API_URL_ENV, DEFAULT_API_URL};
use automail_core::{ApiEndpoints, ConfigError};
use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "automail", about = "Classify email documents and draft replies")]
pub struct Cli {
    /// Backend base URL. A missing scheme defaults to https.
    #[arg(long, env = API_URL_ENV, default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Request timeout in seconds
    #[arg(long, env = "AUTOU_TIMEOUT", default_value = "60")]
    pub timeout: u64,

    /// Where to write logs. The terminal belongs to the UI.
    #[arg(long, env = "AUTOU_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn endpoints(&self) -> Result<ApiEndpoints, ConfigError> {
        ApiEndpoints::new(&self.api_url)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("automail.log"))
    }
}
