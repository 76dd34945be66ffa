//! Tracing initialization and subscriber setup.
//!
//! This module configures the tracing subscriber, wiring `tracing` macros to a
//! plain-text fmt layer that writes into a rotating log file. Standard output
//! stays reserved for the interactive surface.

use super::file_writer::FileWriter;
use crate::infrastructure::paths::{get_data_dir, LOG_FILE};
use crate::Config;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directive when neither `RUST_LOG` nor the configuration
/// names one.
const DEFAULT_LEVEL: &str = "info";

/// Initializes the tracing subscriber with rotating file output.
///
/// # Parameters
///
/// * `config` - Configuration providing `trace_level` and `data_dir`
///
/// # Level Resolution
///
/// 1. `RUST_LOG` environment variable, if set and valid
/// 2. `config.trace_level`
/// 3. Default: `"info"`
///
/// # Returns
///
/// The log file path, or `None` when the data directory cannot be created or
/// a global subscriber is already installed. Logging is optional; failures
/// never abort startup.
///
/// # Example
///
/// ```rust,no_run
/// use wayfinder::observability::init_tracing;
/// use wayfinder::Config;
///
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     ..Default::default()
/// };
///
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) -> Option<PathBuf> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.trace_level.as_deref().unwrap_or(DEFAULT_LEVEL)));

    let data_dir = get_data_dir(config.data_dir.as_deref());
    std::fs::create_dir_all(&data_dir).ok()?;

    let log_file = data_dir.join(LOG_FILE);
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(FileWriter::new(log_file.clone()))
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .ok()?;

    Some(log_file)
}
