/// Domain-specific error types for promcheck using thiserror
///
/// Every variant ends up as an UNKNOWN check result at the CLI boundary. The
/// split into nested enums keeps input errors (thresholds, regexes, config)
/// distinguishable from transport failures so tests can match on them.
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for promcheck operations
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error(transparent)]
    Threshold(#[from] ThresholdError),

    #[error("Invalid regular expression provided: {pattern}: {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid value for --no-alerts-state: {0}")]
    InvalidState(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("{kind} value results are not supported")]
    UnsupportedResult { kind: &'static str },

    #[error("check timed out after {0}s")]
    Timeout(u64),
}

/// Malformed range threshold such as `10:5` or `abc`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid threshold '{spec}': {reason}")]
pub struct ThresholdError {
    pub spec: String,
    pub reason: String,
}

impl ThresholdError {
    pub fn new(spec: &str, reason: impl Into<String>) -> Self {
        Self {
            spec: spec.to_string(),
            reason: reason.into(),
        }
    }
}

/// Connection configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("TOML parsing failed in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("specify the user name and password for server authentication <user:password>")]
    InvalidBasicAuth,

    #[error("client certificate and key must be given together")]
    IncompleteClientIdentity,

    #[error("Invalid value for field '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Invalid header '{header}': expected 'Name: value'")]
    InvalidHeader { header: String },

    #[error("Failed to load TLS material from {path}: {reason}")]
    Tls { path: PathBuf, reason: String },
}

/// Errors raised while talking to the Prometheus HTTP API
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Error creating client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("{error_type}: {message}")]
    Api { error_type: String, message: String },

    #[error("unexpected status {status} from {url}: {body}")]
    UnexpectedStatus {
        url: String,
        status: u16,
        body: String,
    },

    #[error("could not decode {context} response: {source}")]
    Decode {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type alias for promcheck operations
pub type ProbeResult<T> = Result<T, ProbeError>;
