//! Configuration management for wlsbeat
//!
//! Handles loading and validating configuration from YAML files, and builds the
//! immutable [`TargetSet`] read by every polling cycle.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::collector::ServerVersion;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error reading the configuration file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Error parsing the configuration file
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Management REST endpoint configuration
    #[serde(default)]
    pub weblogic: WeblogicConfig,

    /// Polling interval in milliseconds
    #[serde(default = "default_period")]
    pub period_ms: u64,

    /// Resources polled every cycle
    #[serde(default)]
    pub targets: TargetsConfig,

    /// Event output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Management REST endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeblogicConfig {
    /// Admin server base URL (e.g. "https://localhost:7001")
    #[serde(default = "default_host")]
    pub host: String,

    /// Username for basic auth
    #[serde(default)]
    pub username: String,

    /// Password for basic auth
    #[serde(default)]
    pub password: String,

    /// Server version tag selecting the REST adapter
    #[serde(default = "default_version")]
    pub version: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,

    /// Accept self-signed or otherwise invalid admin server certificates
    #[serde(default = "default_insecure_tls")]
    pub insecure_tls: bool,

    /// Value of the `X-Requested-By` header sent with every call
    #[serde(default = "default_requested_by")]
    pub requested_by: String,
}

/// Resource names polled every cycle
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetsConfig {
    /// Managed/admin server names
    #[serde(default)]
    pub servers: Vec<String>,

    /// JDBC datasource names
    #[serde(default)]
    pub datasources: Vec<String>,

    /// Deployed application names
    #[serde(default)]
    pub applications: Vec<String>,
}

/// Event output configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// File to append JSON lines to; stdout when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

// Default value functions
fn default_host() -> String {
    "https://localhost:7001".to_string()
}

fn default_version() -> String {
    "12.2.1".to_string()
}

fn default_timeout() -> u64 {
    5000
}

fn default_period() -> u64 {
    10_000
}

fn default_insecure_tls() -> bool {
    true
}

fn default_requested_by() -> String {
    "wlsbeat".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            weblogic: WeblogicConfig::default(),
            period_ms: default_period(),
            targets: TargetsConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for WeblogicConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            username: String::new(),
            password: String::new(),
            version: default_version(),
            timeout_ms: default_timeout(),
            insecure_tls: default_insecure_tls(),
            requested_by: default_requested_by(),
        }
    }
}

/// Immutable per-cycle view of what to poll and which REST surface to use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSet {
    pub servers: Vec<String>,
    pub datasources: Vec<String>,
    pub applications: Vec<String>,
    /// Version tag as configured
    pub version_tag: String,
}

impl TargetSet {
    /// Adapter variant for this target set's version tag.
    pub fn server_version(&self) -> ServerVersion {
        ServerVersion::resolve(&self.version_tag)
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// The result is not validated yet: CLI and environment overrides are
    /// applied first, then [`Config::validate`] runs on the merged values.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    ///
    /// # Note
    /// - If the file doesn't exist, returns `ConfigError::ReadError`
    /// - Use `Config::load_or_default()` if you want fallback to defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a YAML file, falling back to defaults if not found
    ///
    /// Use this for optional configuration files (e.g., when every value comes
    /// from CLI flags or environment variables)
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "Config file not found, using defaults"
            );
            return Ok(Self::default());
        }

        Self::load(path)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let host = Url::parse(&self.weblogic.host).map_err(|e| {
            ConfigError::ValidationError(format!(
                "Invalid weblogic.host '{}': {}",
                self.weblogic.host, e
            ))
        })?;

        if !matches!(host.scheme(), "http" | "https") {
            return Err(ConfigError::ValidationError(format!(
                "weblogic.host must use http or https, got '{}'",
                host.scheme()
            )));
        }

        if self.period_ms == 0 {
            return Err(ConfigError::ValidationError(
                "period_ms must be greater than 0".to_string(),
            ));
        }

        if self.weblogic.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "weblogic.timeout_ms must be greater than 0".to_string(),
            ));
        }

        check_names("targets.servers", &self.targets.servers)?;
        check_names("targets.datasources", &self.targets.datasources)?;
        check_names("targets.applications", &self.targets.applications)?;

        if self.targets.servers.is_empty() {
            tracing::warn!("No servers configured; only domain-level metrics will be collected");
        }

        Ok(())
    }

    /// Polling interval
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }

    /// Build the immutable target set polled every cycle
    pub fn target_set(&self) -> TargetSet {
        TargetSet {
            servers: self.targets.servers.clone(),
            datasources: self.targets.datasources.clone(),
            applications: self.targets.applications.clone(),
            version_tag: self.weblogic.version.clone(),
        }
    }
}

/// Target names end up in URL paths; they must be non-blank and unique.
fn check_names(field: &str, names: &[String]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for name in names {
        if name.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{} contains an empty name",
                field
            )));
        }
        if !seen.insert(name.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "{} contains duplicate name '{}'",
                field, name
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.weblogic.host, "https://localhost:7001");
        assert_eq!(config.weblogic.requested_by, "wlsbeat");
        assert!(config.weblogic.insecure_tls);
        assert_eq!(config.period(), Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
weblogic:
  host: "https://wls.example.com:7002"
  username: weblogic
  password: welcome1
  version: "12.1.3"
period_ms: 30000
targets:
  servers: [AdminServer, managed1]
  datasources: [AppDS]
  applications: [orders]
output:
  path: /var/log/wlsbeat/events.json
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.weblogic.timeout_ms, 5000);
        assert_eq!(config.targets.servers, vec!["AdminServer", "managed1"]);
        assert_eq!(
            config.output.path,
            Some(PathBuf::from("/var/log/wlsbeat/events.json"))
        );

        let targets = config.target_set();
        assert_eq!(targets.datasources, vec!["AppDS"]);
        assert_eq!(targets.server_version(), ServerVersion::TenantMonitoring);
    }

    #[test]
    fn test_invalid_host() {
        let mut config = Config::default();
        config.weblogic.host = "not a url".to_string();
        assert!(config.validate().is_err());

        config.weblogic.host = "ftp://wls:7001".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_period_rejected() {
        let mut config = Config::default();
        config.period_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duplicate_target_rejected() {
        let mut config = Config::default();
        config.targets.datasources = vec!["ds1".to_string(), "ds1".to_string()];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate name 'ds1'"));
    }

    #[test]
    fn test_load_defers_validation() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "period_ms: 0").unwrap();

        let mut config = Config::load(file.path()).unwrap();
        assert!(config.validate().is_err());

        config.period_ms = 1000;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = Config::load_or_default("/nonexistent/wlsbeat.yaml").unwrap();
        assert_eq!(config.weblogic.version, "12.2.1");
        assert_eq!(config.period_ms, 10_000);
    }

    #[test]
    fn test_blank_target_rejected() {
        let mut config = Config::default();
        config.targets.servers = vec!["  ".to_string()];
        assert!(config.validate().is_err());
    }
}
