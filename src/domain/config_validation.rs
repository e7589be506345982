//! Configuration validation.
//!
//! Validates the storage, report and logging sections before any state is
//! loaded.

use crate::domain::error::FolioError;
use crate::ports::config_port::ConfigPort;

pub const BACKENDS: [&str; 2] = ["json", "sqlite"];
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), FolioError> {
    validate_backend(config)?;
    validate_path(config)?;
    validate_pool_size(config)?;
    validate_currency(config)?;
    validate_log_level(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> FolioError {
    FolioError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_backend(config: &dyn ConfigPort) -> Result<(), FolioError> {
    let backend = config
        .get_string("storage", "backend")
        .unwrap_or_else(|| "json".to_string());
    if !BACKENDS.contains(&backend.trim().to_lowercase().as_str()) {
        return Err(invalid(
            "storage",
            "backend",
            "backend must be one of: json, sqlite",
        ));
    }
    Ok(())
}

fn validate_path(config: &dyn ConfigPort) -> Result<(), FolioError> {
    match config.get_string("storage", "path") {
        None => Err(FolioError::ConfigMissing {
            section: "storage".to_string(),
            key: "path".to_string(),
        }),
        Some(p) if p.trim().is_empty() => Err(invalid("storage", "path", "path must not be empty")),
        Some(_) => Ok(()),
    }
}

fn validate_pool_size(config: &dyn ConfigPort) -> Result<(), FolioError> {
    let value = config.get_int("storage", "pool_size", 1);
    if !(1..=64).contains(&value) {
        return Err(invalid(
            "storage",
            "pool_size",
            "pool_size must be between 1 and 64",
        ));
    }
    Ok(())
}

fn validate_currency(config: &dyn ConfigPort) -> Result<(), FolioError> {
    if let Some(currency) = config.get_string("report", "currency") {
        let currency = currency.trim();
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(invalid(
                "report",
                "currency",
                "currency must be a 3-letter code",
            ));
        }
    }
    Ok(())
}

fn validate_log_level(config: &dyn ConfigPort) -> Result<(), FolioError> {
    if let Some(level) = config.get_string("logging", "level") {
        if !LOG_LEVELS.contains(&level.trim().to_lowercase().as_str()) {
            return Err(invalid(
                "logging",
                "level",
                "level must be one of: trace, debug, info, warn, error",
            ));
        }
    }
    Ok(())
}
