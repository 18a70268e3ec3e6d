//! CSV file record store adapter.
//!
//! Bulk-import format: `trades.csv` and `users.csv` with the same camelCase
//! headers as the JSON documents. Every value arrives as a string and the
//! normalizer does all coercion, so a CSV import and a JSON read produce
//! identical canonical records.

use crate::domain::error::CalldeskError;
use crate::domain::normalize::{RawNumber, RawTradeRecord};
use crate::domain::user::{UserRecord, UserStatus};
use crate::ports::config_port::ConfigPort;
use crate::ports::store_port::StorePort;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::json_store_adapter::required_path;

pub struct CsvStoreAdapter {
    trades_path: PathBuf,
    users_path: PathBuf,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CsvTradeRow {
    id: Option<String>,
    #[serde(alias = "stockName")]
    symbol: Option<String>,
    segment: Option<String>,
    #[serde(alias = "type")]
    action: Option<String>,
    entry_price: Option<String>,
    target_price: Option<String>,
    stop_loss: Option<String>,
    lot_size: Option<String>,
    strike_price: Option<String>,
    option_type: Option<String>,
    expiry_date: Option<String>,
    duration: Option<String>,
    status: Option<String>,
    created_at: Option<String>,
    exit_price: Option<String>,
    profit_loss_percent: Option<String>,
    closed_at: Option<String>,
}

impl From<CsvTradeRow> for RawTradeRecord {
    fn from(row: CsvTradeRow) -> Self {
        RawTradeRecord {
            id: row.id,
            symbol: row.symbol,
            segment: row.segment,
            action: row.action,
            entry_price: row.entry_price.map(RawNumber::Text),
            target_price: row.target_price.map(RawNumber::Text),
            stop_loss: row.stop_loss.map(RawNumber::Text),
            lot_size: row.lot_size.map(RawNumber::Text),
            strike_price: row.strike_price.map(RawNumber::Text),
            option_type: row.option_type,
            expiry_date: row.expiry_date,
            duration: row.duration,
            status: row.status,
            created_at: row.created_at,
            exit_price: row.exit_price.map(RawNumber::Text),
            profit_loss_percent: row.profit_loss_percent.map(RawNumber::Text),
            closed_at: row.closed_at,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CsvUserRow {
    id: Option<String>,
    phone: Option<String>,
    status: Option<String>,
    #[serde(alias = "fcmToken")]
    push_token: Option<String>,
    name: Option<String>,
    created_at: Option<String>,
    subscription_end_date: Option<String>,
}

impl CsvStoreAdapter {
    pub fn new(trades_path: PathBuf, users_path: PathBuf) -> Self {
        Self {
            trades_path,
            users_path,
        }
    }

    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, CalldeskError> {
        Ok(Self::new(
            required_path(config, "trades")?,
            required_path(config, "users")?,
        ))
    }

    fn reader(path: &Path) -> Result<csv::Reader<std::fs::File>, CalldeskError> {
        csv::Reader::from_path(path).map_err(|e| CalldeskError::Store {
            reason: format!("failed to read {}: {}", path.display(), e),
        })
    }
}

impl StorePort for CsvStoreAdapter {
    fn fetch_trades(&self) -> Result<Vec<RawTradeRecord>, CalldeskError> {
        let mut rdr = Self::reader(&self.trades_path)?;
        let mut raws = Vec::new();
        for result in rdr.deserialize::<CsvTradeRow>() {
            let row = result.map_err(|e| CalldeskError::Store {
                reason: format!("CSV parse error in {}: {}", self.trades_path.display(), e),
            })?;
            raws.push(row.into());
        }
        Ok(raws)
    }

    fn fetch_users(&self) -> Result<Vec<UserRecord>, CalldeskError> {
        let mut rdr = Self::reader(&self.users_path)?;
        let mut users = Vec::new();
        for (line, result) in rdr.deserialize::<CsvUserRow>().enumerate() {
            let row = result.map_err(|e| CalldeskError::Store {
                reason: format!("CSV parse error in {}: {}", self.users_path.display(), e),
            })?;
            let record = line + 2; // header is line 1
            let id = row.id.filter(|s| !s.trim().is_empty()).ok_or_else(|| {
                CalldeskError::Store {
                    reason: format!("{}: missing id on line {}", self.users_path.display(), record),
                }
            })?;
            let phone = row.phone.filter(|s| !s.trim().is_empty()).ok_or_else(|| {
                CalldeskError::Store {
                    reason: format!(
                        "{}: missing phone on line {}",
                        self.users_path.display(),
                        record
                    ),
                }
            })?;
            let status = match row.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
                Some(s) => UserStatus::from_name(s).ok_or_else(|| CalldeskError::Store {
                    reason: format!(
                        "{}: unknown status {:?} on line {}",
                        self.users_path.display(),
                        s,
                        record
                    ),
                })?,
                None => UserStatus::default(),
            };
            users.push(UserRecord {
                id,
                phone,
                status,
                push_token: row.push_token,
                name: row.name,
                created_at: row.created_at,
                subscription_end_date: row.subscription_end_date,
            });
        }
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::normalize;
    use std::fs;
    use tempfile::TempDir;

    fn setup(trades: &str, users: &str) -> (TempDir, CsvStoreAdapter) {
        let dir = TempDir::new().unwrap();
        let trades_path = dir.path().join("trades.csv");
        let users_path = dir.path().join("users.csv");
        fs::write(&trades_path, trades).unwrap();
        fs::write(&users_path, users).unwrap();
        (dir, CsvStoreAdapter::new(trades_path, users_path))
    }

    const TRADES_CSV: &str = "\
id,symbol,segment,action,entryPrice,targetPrice,stopLoss,status,createdAt\n\
t1,reliance,equity,BUY,2900,3050,2850,ACTIVE,2025-06-01T09:30:00Z\n\
t2,nifty,futures,SELL,24800,24500,,ACTIVE,2025-06-02T09:45:00Z\n";

    const USERS_CSV: &str = "\
id,phone,status,fcmToken,subscriptionEndDate\n\
u1,+911234567890,ACTIVE,tok-1,2025-12-31\n\
u2,+919876543210,,,\n";

    #[test]
    fn trades_round_through_the_normalizer() {
        let (_dir, adapter) = setup(TRADES_CSV, USERS_CSV);
        let raws = adapter.fetch_trades().unwrap();
        assert_eq!(raws.len(), 2);

        let outcome = normalize::normalize_batch(&raws);
        assert!(outcome.skipped.is_empty());
        assert_eq!(outcome.records[0].symbol, "RELIANCE");
        assert_eq!(outcome.records[0].entry_price, 2900.0);
        // empty stopLoss column means no stop
        assert_eq!(outcome.records[1].stop_loss, None);
    }

    #[test]
    fn users_parse_with_defaults() {
        let (_dir, adapter) = setup(TRADES_CSV, USERS_CSV);
        let users = adapter.fetch_users().unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].status, UserStatus::Active);
        assert_eq!(users[0].push_token.as_deref(), Some("tok-1"));
        assert_eq!(users[1].status, UserStatus::Free);
        assert_eq!(users[1].push_token, None);
    }

    #[test]
    fn unknown_user_status_is_a_store_error() {
        let users = "id,phone,status\nu1,+911111111111,SUSPENDED\n";
        let (_dir, adapter) = setup(TRADES_CSV, users);
        assert!(matches!(
            adapter.fetch_users(),
            Err(CalldeskError::Store { .. })
        ));
    }

    #[test]
    fn missing_file_is_a_store_error() {
        let dir = TempDir::new().unwrap();
        let adapter = CsvStoreAdapter::new(
            dir.path().join("absent.csv"),
            dir.path().join("absent2.csv"),
        );
        assert!(matches!(
            adapter.fetch_trades(),
            Err(CalldeskError::Store { .. })
        ));
    }
}
