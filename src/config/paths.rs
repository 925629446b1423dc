//! Platform-aware configuration paths for promcheck

use std::env;
use std::path::PathBuf;

use crate::core::constants::{env_vars, CONFIG_FILE_NAME};

/// Configuration directory: `$PROMCHECK_CONFIG_DIR`, else the platform config dir.
pub fn config_dir() -> Option<PathBuf> {
    if let Ok(custom_dir) = env::var(env_vars::CONFIG_DIR) {
        return Some(PathBuf::from(custom_dir));
    }

    dirs::config_dir().map(|p| p.join("promcheck"))
}

/// Default location of the connection settings file. It may not exist.
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}
