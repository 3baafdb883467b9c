//! Station configuration
//!
//! # Environment variables
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | RECEIPT_SETTINGS_PATH | ./work_dir/settings.json | Persisted printer/user settings |
//! | LOG_LEVEL | info | Log filter when `RUST_LOG` is unset |
//! | LOG_JSON | false | JSON log lines |
//! | LOG_DIR | (none) | Daily rolling log files |
//! | SERIAL_PORT | (none) | Direct channel device, e.g. `/dev/ttyUSB0` |
//! | PRINT_TIMEOUT_MS | 5000 | Network and channel timeout |

use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    /// JSON file backing the key-value settings store
    pub settings_path: PathBuf,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
    /// Serial device for the direct byte channel, if one is attached
    pub serial_port: Option<String>,
    pub print_timeout_ms: u64,
}

impl Config {
    /// Load from environment variables, with defaults for anything unset
    pub fn from_env() -> Self {
        Self {
            settings_path: std::env::var("RECEIPT_SETTINGS_PATH")
                .unwrap_or_else(|_| "./work_dir/settings.json".into())
                .into(),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: std::env::var("LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            serial_port: std::env::var("SERIAL_PORT").ok().filter(|p| !p.is_empty()),
            print_timeout_ms: std::env::var("PRINT_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5000),
        }
    }

    pub fn print_timeout(&self) -> Duration {
        Duration::from_millis(self.print_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
