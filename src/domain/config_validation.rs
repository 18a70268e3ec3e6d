//! Configuration validation.
//!
//! Checked once up front, before any command touches the record store.

use crate::domain::error::CalldeskError;
use crate::ports::config_port::ConfigPort;

pub const SUPPORTED_FORMATS: [&str; 2] = ["json", "csv"];

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), CalldeskError> {
    validate_path_key(config, "trades")?;
    validate_path_key(config, "users")?;
    validate_format(config)?;
    Ok(())
}

fn validate_path_key(config: &dyn ConfigPort, key: &str) -> Result<(), CalldeskError> {
    match config.get_string("data", key) {
        Some(value) if !value.trim().is_empty() => Ok(()),
        _ => Err(CalldeskError::ConfigMissing {
            section: "data".to_string(),
            key: key.to_string(),
        }),
    }
}

fn validate_format(config: &dyn ConfigPort) -> Result<(), CalldeskError> {
    let format = config
        .get_string("data", "format")
        .unwrap_or_else(|| "json".to_string());
    if SUPPORTED_FORMATS.contains(&format.trim().to_lowercase().as_str()) {
        return Ok(());
    }
    Err(CalldeskError::ConfigInvalid {
        section: "data".to_string(),
        key: "format".to_string(),
        reason: format!("unsupported format {:?} (expected json or csv)", format),
    })
}
