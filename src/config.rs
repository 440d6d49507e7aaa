//! Server configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use minimax_tictactoe::{DEFAULT_EXPLAIN_DEPTH, FailurePolicy, SearchOptions};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Configuration for the HTTP service and the engine behind it.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    host: String,

    /// Port to bind to.
    #[serde(default = "default_port")]
    port: u16,

    /// Plies below the root included in explanation trees.
    #[serde(default = "default_explain_depth")]
    explain_depth: u8,

    /// Deadline for a single move or explanation computation.
    #[serde(default)]
    request_timeout_ms: Option<u64>,

    /// Handling of rule query failures deep in the search.
    #[serde(default)]
    on_rule_failure: FailurePolicy,

    /// Tracing filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    log_filter: String,
}

#[instrument]
fn default_host() -> String {
    "127.0.0.1".to_string()
}

#[instrument]
fn default_port() -> u16 {
    8000
}

#[instrument]
fn default_explain_depth() -> u8 {
    DEFAULT_EXPLAIN_DEPTH
}

#[instrument]
fn default_log_filter() -> String {
    "info,minimax_tictactoe=info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            explain_depth: default_explain_depth(),
            request_timeout_ms: None,
            on_rule_failure: FailurePolicy::default(),
            log_filter: default_log_filter(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(host = %config.host, port = config.port, "Config loaded successfully");
        Ok(config)
    }

    /// Parses and validates a TOML document.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()
    }

    /// Loads `path` if it exists, otherwise falls back to defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Rejects values the service cannot run with.
    pub fn validate(self) -> Result<Self, ConfigError> {
        Self::check_explain_depth(self.explain_depth)?;
        if self.request_timeout_ms == Some(0) {
            return Err(ConfigError::new(
                "request_timeout_ms must be positive".to_string(),
            ));
        }
        Ok(self)
    }

    /// Accepts explanation depths from 1 to 9 plies.
    #[track_caller]
    pub fn check_explain_depth(depth: u8) -> Result<u8, ConfigError> {
        if depth == 0 || depth > 9 {
            return Err(ConfigError::new(format!(
                "explain_depth must be between 1 and 9, got {}",
                depth
            )));
        }
        Ok(depth)
    }

    /// Address to bind, as `host:port`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Deadline for one computation, if configured.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    /// Search options derived from this configuration.
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions::default().with_on_rule_failure(self.on_rule_failure)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
