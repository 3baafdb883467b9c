//! Logging setup
//!
//! Console output always; with a log directory also:
//! - Daily rotating application logs (`app/`)
//! - Daily manual-print logs (`manual/`), receipts that could not be delivered
//!   and must be printed by hand

use std::fs;
use std::path::Path;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, prelude::*};

/// Target used for receipts the operator has to print manually
pub const MANUAL_PRINT_TARGET: &str = "manual_print";

/// Initialize the logging system
///
/// # Arguments
/// * `level` - Log level used when `RUST_LOG` is unset (e.g. "info")
/// * `json_format` - JSON lines instead of the human-readable format
/// * `log_dir` - Optional directory for file logging
pub fn init_logger(level: &str, json_format: bool, log_dir: Option<&str>) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console_layer = if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_file(false)
            .with_writer(std::io::stderr)
            .boxed()
    };

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    let Some(dir) = log_dir else {
        subscriber.init();
        return Ok(());
    };

    let log_dir = Path::new(dir);
    let app_log_dir = log_dir.join("app");
    let manual_log_dir = log_dir.join("manual");
    fs::create_dir_all(&app_log_dir)?;
    fs::create_dir_all(&manual_log_dir)?;

    let app_log = RollingFileAppender::new(Rotation::DAILY, app_log_dir, "app");
    let app_layer = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(app_log))
        .with_filter(tracing_subscriber::filter::filter_fn(|meta| {
            meta.target() != MANUAL_PRINT_TARGET
        }));

    // Receipt text arrives in the message, keep it unwrapped
    let manual_log = RollingFileAppender::new(Rotation::DAILY, manual_log_dir, "manual");
    let manual_layer = fmt::layer()
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(manual_log))
        .with_filter(tracing_subscriber::filter::filter_fn(|meta| {
            meta.target() == MANUAL_PRINT_TARGET
        }));

    subscriber.with(app_layer).with(manual_layer).init();
    Ok(())
}
