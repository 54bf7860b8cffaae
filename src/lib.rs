//! wlsbeat library
//!
//! This crate polls a WebLogic domain's management REST API and republishes
//! server, datasource, application and thread pool health as normalized events,
//! independent of which REST surface generation the domain exposes.

pub mod cli;
pub mod collector;
pub mod config;
pub mod error;
pub mod event;
pub mod poller;

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::LogFormat;

/// Initialize the logging subsystem
///
/// Logs go to stderr; stdout is reserved for events.
///
/// # Arguments
/// * `level` - Log level string (trace, debug, info, warn, error)
/// * `format` - Human-readable text or JSON lines
///
/// # Errors
/// Returns an error if the logging system fails to initialize
pub fn init_logging(level: &str, format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    let result = match format {
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    result.map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
