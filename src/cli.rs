//! CLI argument parsing for wlsbeat
//!
//! This module provides the command-line interface using clap derive macros.
//!
//! # Options
//!
//! - `--config` / `-c`: Configuration file path (default: wlsbeat.yaml, env: WLSBEAT_CONFIG)
//! - `--host`: Admin server URL (env: WLSBEAT_HOST)
//! - `--username`: Basic auth username (env: WLSBEAT_USERNAME)
//! - `--password`: Basic auth password (env: WLSBEAT_PASSWORD)
//! - `--server-version`: REST surface version tag (env: WLSBEAT_SERVER_VERSION)
//! - `--period-ms`: Polling interval in milliseconds (env: WLSBEAT_PERIOD_MS)
//! - `--timeout-ms`: HTTP timeout in milliseconds (env: WLSBEAT_TIMEOUT_MS)
//! - `--output`: File to append events to instead of stdout (env: WLSBEAT_OUTPUT)
//! - `--validate`: Validate configuration and exit
//! - `--once`: Run a single polling cycle and exit
//! - `--log-level` / `-l`: Log level (trace/debug/info/warn/error, env: WLSBEAT_LOG_LEVEL)
//! - `--log-format`: Log format (text/json, env: WLSBEAT_LOG_FORMAT)
//!
//! # Precedence
//!
//! Configuration values are resolved in the following order (highest to lowest priority):
//! 1. CLI arguments
//! 2. Environment variables
//! 3. Configuration file
//! 4. Default values

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::Config;

/// wlsbeat - WebLogic domain metrics poller
///
/// Polls the WebLogic management REST API and writes normalized server,
/// datasource, application and thread pool events as JSON lines.
#[derive(Parser, Debug)]
#[command(name = "wlsbeat")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to configuration file
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "wlsbeat.yaml",
        env = "WLSBEAT_CONFIG"
    )]
    pub config: PathBuf,

    /// Admin server URL (overrides config file)
    #[arg(long, value_name = "URL", env = "WLSBEAT_HOST")]
    pub host: Option<String>,

    /// Basic auth username (overrides config file)
    #[arg(long, value_name = "USERNAME", env = "WLSBEAT_USERNAME")]
    pub username: Option<String>,

    /// Basic auth password (overrides config file)
    #[arg(long, value_name = "PASSWORD", env = "WLSBEAT_PASSWORD")]
    pub password: Option<String>,

    /// Server version tag, e.g. 12.1.3 or 12.2.1 (overrides config file)
    #[arg(long, value_name = "VERSION", env = "WLSBEAT_SERVER_VERSION")]
    pub server_version: Option<String>,

    /// Polling interval in milliseconds (overrides config file)
    #[arg(long, value_name = "MS", env = "WLSBEAT_PERIOD_MS")]
    pub period_ms: Option<u64>,

    /// HTTP timeout in milliseconds (overrides config file)
    #[arg(long, value_name = "MS", env = "WLSBEAT_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    /// Append events to this file instead of stdout (overrides config file)
    #[arg(long, value_name = "FILE", env = "WLSBEAT_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Validate configuration and exit
    #[arg(long)]
    pub validate: bool,

    /// Run a single polling cycle and exit
    #[arg(long)]
    pub once: bool,

    /// Log level
    #[arg(
        short,
        long,
        value_enum,
        default_value = "info",
        env = "WLSBEAT_LOG_LEVEL"
    )]
    pub log_level: LogLevel,

    /// Log output format
    #[arg(long, value_enum, default_value = "text", env = "WLSBEAT_LOG_FORMAT")]
    pub log_format: LogFormat,
}

impl Cli {
    /// Apply CLI/env overrides on top of file configuration
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.weblogic.host = host.clone();
        }
        if let Some(username) = &self.username {
            config.weblogic.username = username.clone();
        }
        if let Some(password) = &self.password {
            config.weblogic.password = password.clone();
        }
        if let Some(version) = &self.server_version {
            config.weblogic.version = version.clone();
        }
        if let Some(period_ms) = self.period_ms {
            config.period_ms = period_ms;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.weblogic.timeout_ms = timeout_ms;
        }
        if let Some(output) = &self.output {
            config.output.path = Some(output.clone());
        }
    }
}

/// Log level options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Trace level - most verbose
    Trace,
    /// Debug level
    Debug,
    /// Info level - default
    Info,
    /// Warn level
    Warn,
    /// Error level - least verbose
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// Log output format
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text output
    Text,
    /// JSON lines
    Json,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}
