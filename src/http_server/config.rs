//! Listener and CORS settings for the tournament API
//!
//! Read from the `http` part of the service config file; every key is
//! optional.

use axum::http::{HeaderValue, Uri};
use serde::{Deserialize, Serialize};

/// Where the API listens and which browser origins may call it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpServerConfig {
    /// Bind address; all interfaces unless set
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Origins allowed by CORS, as `scheme://host[:port]`. Empty allows any
    /// origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

impl HttpServerConfig {
    /// Defaults with the listener moved to `port`
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// `host:port` for the listener
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Parses `cors_origins` into header values.
    ///
    /// # Errors
    ///
    /// Names the first entry that is not a bare `scheme://host[:port]`
    /// origin.
    pub fn allowed_origins(&self) -> Result<Vec<HeaderValue>, String> {
        self.cors_origins
            .iter()
            .map(String::as_str)
            .map(parse_origin)
            .collect()
    }
}

fn parse_origin(origin: &str) -> Result<HeaderValue, String> {
    let invalid = || format!("invalid CORS origin '{}': expected scheme://host[:port]", origin);

    let uri: Uri = origin.parse().map_err(|_| invalid())?;
    let bare = uri.scheme().is_some()
        && uri.authority().is_some()
        && uri.query().is_none()
        && uri.path() == "/"
        && !origin.ends_with('/');
    if !bare {
        return Err(invalid());
    }

    HeaderValue::from_str(origin).map_err(|_| invalid())
}
