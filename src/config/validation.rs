//! Connection settings validation

use crate::config::ConnectionConfig;
use crate::core::errors::ConfigError;

/// Split `user:password`. Exactly one separator is accepted.
pub fn parse_basic_auth(raw: &str) -> Result<(String, String), ConfigError> {
    let mut parts = raw.split(':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(user), Some(password), None) => Ok((user.to_string(), password.to_string())),
        _ => Err(ConfigError::InvalidBasicAuth),
    }
}

/// Split a `Name: value` header line, trimming both sides.
pub fn parse_header(raw: &str) -> Result<(String, String), ConfigError> {
    match raw.split_once(':') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(ConfigError::InvalidHeader {
            header: raw.to_string(),
        }),
    }
}

impl ConnectionConfig {
    /// Reject settings that cannot produce a working client.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hostname.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "hostname".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        if self.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "port".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeout".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }

        if let Some(raw) = &self.basic_auth {
            parse_basic_auth(raw)?;
        }

        if self.cert_file.is_some() != self.key_file.is_some() {
            return Err(ConfigError::IncompleteClientIdentity);
        }

        for header in &self.headers {
            parse_header(header)?;
        }

        Ok(())
    }
}
