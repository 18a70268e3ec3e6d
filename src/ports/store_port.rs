//! Record store port trait.
//!
//! The store hands back read models exactly as persisted; trade records
//! stay in their raw wire shape so the normalizer remains the single
//! schema-migration boundary.

use crate::domain::error::CalldeskError;
use crate::domain::normalize::RawTradeRecord;
use crate::domain::user::UserRecord;

pub trait StorePort {
    fn fetch_trades(&self) -> Result<Vec<RawTradeRecord>, CalldeskError>;

    fn fetch_users(&self) -> Result<Vec<UserRecord>, CalldeskError>;
}
