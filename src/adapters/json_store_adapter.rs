//! JSON file record store adapter.
//!
//! Reads the same document shapes the managed store serves: one JSON array
//! of trade records, one of user records.

use crate::domain::error::CalldeskError;
use crate::domain::normalize::RawTradeRecord;
use crate::domain::user::UserRecord;
use crate::ports::config_port::ConfigPort;
use crate::ports::store_port::StorePort;
use std::fs;
use std::path::{Path, PathBuf};

pub struct JsonStoreAdapter {
    trades_path: PathBuf,
    users_path: PathBuf,
}

impl JsonStoreAdapter {
    pub fn new(trades_path: PathBuf, users_path: PathBuf) -> Self {
        Self {
            trades_path,
            users_path,
        }
    }

    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, CalldeskError> {
        let trades_path = required_path(config, "trades")?;
        let users_path = required_path(config, "users")?;
        Ok(Self::new(trades_path, users_path))
    }

    fn read(path: &Path) -> Result<String, CalldeskError> {
        fs::read_to_string(path).map_err(|e| CalldeskError::Store {
            reason: format!("failed to read {}: {}", path.display(), e),
        })
    }
}

pub(crate) fn required_path(
    config: &dyn ConfigPort,
    key: &str,
) -> Result<PathBuf, CalldeskError> {
    config
        .get_string("data", key)
        .map(PathBuf::from)
        .ok_or_else(|| CalldeskError::ConfigMissing {
            section: "data".to_string(),
            key: key.to_string(),
        })
}

impl StorePort for JsonStoreAdapter {
    fn fetch_trades(&self) -> Result<Vec<RawTradeRecord>, CalldeskError> {
        let content = Self::read(&self.trades_path)?;
        serde_json::from_str(&content).map_err(|e| CalldeskError::Store {
            reason: format!("invalid trade JSON in {}: {}", self.trades_path.display(), e),
        })
    }

    fn fetch_users(&self) -> Result<Vec<UserRecord>, CalldeskError> {
        let content = Self::read(&self.users_path)?;
        serde_json::from_str(&content).map_err(|e| CalldeskError::Store {
            reason: format!("invalid user JSON in {}: {}", self.users_path.display(), e),
        })
    }
}
