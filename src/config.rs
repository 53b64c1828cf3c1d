// src/config.rs

//! Configuration loading utilities.
//!
//! Settings come from an optional TOML file; credentials and mail settings
//! are overlaid from `DOSSIER_*` environment variables, which may live in a
//! `.env` file next to the binary.

use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::Config;

/// Load the TOML file (or defaults), then the environment, then validate.
pub fn load_all(path: &Path) -> Result<Config> {
    let mut config = if path.exists() {
        Config::load(path)?
    } else {
        log::debug!("No config file at {}, using defaults", path.display());
        Config::default()
    };

    match dotenvy::dotenv() {
        Ok(env_file) => log::debug!("Loaded environment from {}", env_file.display()),
        Err(e) if e.not_found() => {}
        Err(e) => return Err(AppError::config(format!("Invalid .env file: {e}"))),
    }

    config.apply_env(|key| std::env::var(key).ok())?;
    config
        .validate()
        .map_err(|e| AppError::config(format!("Invalid configuration: {e}")))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_all_rejects_malformed_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bulletin.toml");
        std::fs::write(&path, "[schedule\ninterval_secs = ").unwrap();

        let err = load_all(&path).unwrap_err();
        assert!(matches!(err, AppError::Toml(_)));
    }
}
