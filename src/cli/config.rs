//! Service configuration file
//!
//! JSON, every field optional:
//!
//! ```json
//! {
//!   "data_dir": "./data",
//!   "host": "0.0.0.0",
//!   "port": 8000,
//!   "cors_origins": [],
//!   "log_filter": "info,tourneydb=debug"
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::http_server::HttpServerConfig;
use crate::observability::DEFAULT_LOG_FILTER;

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Directory holding live tables and archives (default "./data")
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Bind address and CORS
    #[serde(flatten)]
    pub http: HttpServerConfig,

    /// `tracing` filter directive; `RUST_LOG` takes precedence
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_data_dir() -> String {
    "./data".to_string()
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            http: HttpServerConfig::default(),
            log_filter: default_log_filter(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::config_error(format!("Failed to read config {:?}: {}", path, e))
        })?;

        let config: ServiceConfig = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load from `path` if given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> CliResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Applies command line overrides and re-validates
    pub fn with_overrides(
        mut self,
        data_dir: Option<String>,
        host: Option<String>,
        port: Option<u16>,
    ) -> CliResult<Self> {
        if let Some(data_dir) = data_dir {
            self.data_dir = data_dir;
        }
        if let Some(host) = host {
            self.http.host = host;
        }
        if let Some(port) = port {
            self.http.port = port;
        }
        self.validate()?;
        Ok(self)
    }

    /// Validate configuration
    pub fn validate(&self) -> CliResult<()> {
        if self.data_dir.trim().is_empty() {
            return Err(CliError::config_error("data_dir must not be empty"));
        }

        if self.http.port == 0 {
            return Err(CliError::config_error("port must be > 0"));
        }

        self.http
            .allowed_origins()
            .map_err(CliError::config_error)?;

        Ok(())
    }

    /// Get data directory as Path
    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_dir)
    }
}
