//! Connection settings for the Prometheus server.
//!
//! Layers, lowest precedence first: built-in defaults, the TOML file,
//! environment variables and explicit command-line flags. The last two
//! arrive together as [`ConnectionOverrides`] because clap resolves both.

pub mod paths;
pub mod validation;

pub use paths::{config_dir, config_file};
pub use validation::{parse_basic_auth, parse_header};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::core::constants::{DEFAULT_HOSTNAME, DEFAULT_PORT, DEFAULT_TIMEOUT_SECS};
use crate::core::errors::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConnectionConfig {
    pub hostname: String,
    pub port: u16,
    /// Path prefix when Prometheus is served below the web root
    pub url: String,
    /// Use https
    pub secure: bool,
    /// Skip TLS certificate verification
    pub insecure: bool,
    pub bearer: Option<String>,
    /// `user:password`
    pub basic_auth: Option<String>,
    pub ca_file: Option<PathBuf>,
    pub cert_file: Option<PathBuf>,
    pub key_file: Option<PathBuf>,
    /// Extra request headers as `Name: value`
    pub headers: Vec<String>,
    #[serde(rename = "timeout")]
    pub timeout_secs: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            hostname: DEFAULT_HOSTNAME.to_string(),
            port: DEFAULT_PORT,
            url: String::new(),
            secure: false,
            insecure: false,
            bearer: None,
            basic_auth: None,
            ca_file: None,
            cert_file: None,
            key_file: None,
            headers: Vec::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Values given on the command line or through the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionOverrides {
    pub hostname: Option<String>,
    pub port: Option<u16>,
    pub url: Option<String>,
    pub secure: bool,
    pub insecure: bool,
    pub bearer: Option<String>,
    pub basic_auth: Option<String>,
    pub ca_file: Option<PathBuf>,
    pub cert_file: Option<PathBuf>,
    pub key_file: Option<PathBuf>,
    pub headers: Vec<String>,
    pub timeout_secs: Option<u64>,
}

impl ConnectionConfig {
    /// Load settings from `explicit`, or from the default location when it
    /// exists. An explicit path that does not exist is an error.
    pub async fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound {
                        path: path.to_path_buf(),
                    });
                }
                Self::load_file(path).await
            }
            None => match config_file() {
                Some(path) if path.exists() => Self::load_file(&path).await,
                _ => Ok(Self::default()),
            },
        }
    }

    /// Parse one TOML settings file.
    pub async fn load_file(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "loading connection settings");
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn apply_overrides(&mut self, overrides: ConnectionOverrides) {
        if let Some(hostname) = overrides.hostname {
            self.hostname = hostname;
        }
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(url) = overrides.url {
            self.url = url;
        }
        self.secure |= overrides.secure;
        self.insecure |= overrides.insecure;
        if overrides.bearer.is_some() {
            self.bearer = overrides.bearer;
        }
        if overrides.basic_auth.is_some() {
            self.basic_auth = overrides.basic_auth;
        }
        if overrides.ca_file.is_some() {
            self.ca_file = overrides.ca_file;
        }
        if overrides.cert_file.is_some() {
            self.cert_file = overrides.cert_file;
        }
        if overrides.key_file.is_some() {
            self.key_file = overrides.key_file;
        }
        self.headers.extend(overrides.headers);
        if let Some(timeout) = overrides.timeout_secs {
            self.timeout_secs = timeout;
        }
    }

    /// `http(s)://<hostname>:<port><url>` without a trailing slash.
    pub fn base_url(&self) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        let path = self.url.trim_matches('/');
        if path.is_empty() {
            format!("{scheme}://{}:{}", self.hostname, self.port)
        } else {
            format!("{scheme}://{}:{}/{path}", self.hostname, self.port)
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn basic_credentials(&self) -> Result<Option<(String, String)>, ConfigError> {
        self.basic_auth.as_deref().map(parse_basic_auth).transpose()
    }

    pub fn parsed_headers(&self) -> Result<Vec<(String, String)>, ConfigError> {
        self.headers.iter().map(|h| parse_header(h)).collect()
    }
}
