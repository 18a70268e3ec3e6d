#![allow(dead_code)]

use calldesk::domain::error::CalldeskError;
use calldesk::domain::normalize::{RawNumber, RawTradeRecord};
use calldesk::domain::user::{UserRecord, UserStatus};
use calldesk::ports::store_port::StorePort;
use chrono::NaiveDate;

pub struct MockStorePort {
    pub trades: Vec<RawTradeRecord>,
    pub users: Vec<UserRecord>,
    pub fail_with: Option<String>,
}

impl MockStorePort {
    pub fn new() -> Self {
        Self {
            trades: Vec::new(),
            users: Vec::new(),
            fail_with: None,
        }
    }

    pub fn with_trades(mut self, trades: Vec<RawTradeRecord>) -> Self {
        self.trades = trades;
        self
    }

    pub fn with_users(mut self, users: Vec<UserRecord>) -> Self {
        self.users = users;
        self
    }

    pub fn with_error(mut self, reason: &str) -> Self {
        self.fail_with = Some(reason.to_string());
        self
    }
}

impl StorePort for MockStorePort {
    fn fetch_trades(&self) -> Result<Vec<RawTradeRecord>, CalldeskError> {
        if let Some(reason) = &self.fail_with {
            return Err(CalldeskError::Store {
                reason: reason.clone(),
            });
        }
        Ok(self.trades.clone())
    }

    fn fetch_users(&self) -> Result<Vec<UserRecord>, CalldeskError> {
        if let Some(reason) = &self.fail_with {
            return Err(CalldeskError::Store {
                reason: reason.clone(),
            });
        }
        Ok(self.users.clone())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn raw_active_trade(id: &str, symbol: &str, segment: Option<&str>) -> RawTradeRecord {
    RawTradeRecord {
        id: Some(id.to_string()),
        symbol: Some(symbol.to_string()),
        segment: segment.map(str::to_string),
        action: Some("BUY".to_string()),
        entry_price: Some(RawNumber::Num(100.0)),
        target_price: Some(RawNumber::Num(115.0)),
        stop_loss: Some(RawNumber::Num(92.0)),
        status: Some("ACTIVE".to_string()),
        created_at: Some("2025-06-01T09:30:00Z".to_string()),
        ..RawTradeRecord::default()
    }
}

pub fn raw_closed_trade(id: &str, symbol: &str, segment: Option<&str>, pct: f64) -> RawTradeRecord {
    RawTradeRecord {
        id: Some(id.to_string()),
        symbol: Some(symbol.to_string()),
        segment: segment.map(str::to_string),
        action: Some("BUY".to_string()),
        entry_price: Some(RawNumber::Num(100.0)),
        target_price: Some(RawNumber::Num(115.0)),
        created_at: Some("2025-05-01T09:30:00Z".to_string()),
        exit_price: Some(RawNumber::Num(100.0 + pct)),
        profit_loss_percent: Some(RawNumber::Num(pct)),
        closed_at: Some("2025-05-20T15:30:00Z".to_string()),
        ..RawTradeRecord::default()
    }
}

pub fn make_user(
    id: &str,
    status: UserStatus,
    token: Option<&str>,
    end_date: Option<&str>,
) -> UserRecord {
    UserRecord {
        id: id.to_string(),
        phone: format!("+91-90000-{}", id),
        status,
        push_token: token.map(str::to_string),
        name: None,
        created_at: Some("2025-01-10T08:00:00Z".to_string()),
        subscription_end_date: end_date.map(str::to_string),
    }
}
