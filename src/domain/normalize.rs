//! Schema-migration boundary for stored trade records.
//!
//! The persistence layer has accumulated several historical shapes: an
//! equity-only schema with `stockName`/`type` field names and no segment,
//! and a newer multi-segment schema with numeric fields sometimes stored as
//! strings. [`normalize`] coerces any of them into one canonical
//! [`TradeRecord`]; nothing downstream ever special-cases a missing field
//! again.

use crate::domain::error::ValidationError;
use crate::domain::trade::{OptionType, Segment, TradeAction, TradeExit, TradeRecord};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

/// A numeric field as it appears on the wire: a real number or a string
/// holding one.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Num(f64),
    Text(String),
}

impl RawNumber {
    fn coerce(&self, field: &'static str) -> Result<f64, ValidationError> {
        let value = match self {
            RawNumber::Num(n) => *n,
            RawNumber::Text(s) => {
                s.trim()
                    .parse::<f64>()
                    .map_err(|_| ValidationError::NonNumeric {
                        field,
                        value: s.clone(),
                    })?
            }
        };
        if !value.is_finite() {
            return Err(ValidationError::NonNumeric {
                field,
                value: self.display_string(),
            });
        }
        Ok(value)
    }

    fn display_string(&self) -> String {
        match self {
            RawNumber::Num(n) => n.to_string(),
            RawNumber::Text(s) => s.clone(),
        }
    }
}

impl From<f64> for RawNumber {
    fn from(value: f64) -> Self {
        RawNumber::Num(value)
    }
}

impl From<&str> for RawNumber {
    fn from(value: &str) -> Self {
        RawNumber::Text(value.to_string())
    }
}

/// A stored trade record before normalization. Every field is optional and
/// the legacy names (`stockName`, `type`) are accepted as aliases.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawTradeRecord {
    pub id: Option<String>,
    #[serde(alias = "stockName")]
    pub symbol: Option<String>,
    pub segment: Option<String>,
    #[serde(alias = "type")]
    pub action: Option<String>,
    pub entry_price: Option<RawNumber>,
    pub target_price: Option<RawNumber>,
    pub stop_loss: Option<RawNumber>,
    pub lot_size: Option<RawNumber>,
    pub strike_price: Option<RawNumber>,
    pub option_type: Option<String>,
    pub expiry_date: Option<String>,
    pub duration: Option<String>,
    pub status: Option<String>,
    pub created_at: Option<String>,
    pub exit_price: Option<RawNumber>,
    pub profit_loss_percent: Option<RawNumber>,
    pub closed_at: Option<String>,
}

fn parse_timestamp(field: &'static str, value: &str) -> Result<DateTime<Utc>, ValidationError> {
    let trimmed = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt.and_utc());
        }
    }
    Err(ValidationError::InvalidTimestamp {
        field,
        value: value.to_string(),
    })
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc).date_naive());
    }
    Err(ValidationError::InvalidTimestamp {
        field,
        value: value.to_string(),
    })
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

/// Coerce one raw record into canonical form.
///
/// Idempotent: normalizing the raw projection of an already-canonical
/// record reproduces it exactly.
pub fn normalize(raw: &RawTradeRecord) -> Result<TradeRecord, ValidationError> {
    let id = non_empty(raw.id.as_ref())
        .ok_or(ValidationError::MissingField("id"))?
        .to_string();

    let symbol = non_empty(raw.symbol.as_ref())
        .ok_or(ValidationError::EmptySymbol)?
        .to_uppercase();

    let segment = Segment::from_raw(raw.segment.as_deref());

    let action = TradeAction::from_name(
        non_empty(raw.action.as_ref()).ok_or(ValidationError::MissingField("action"))?,
    )?;

    let entry_price = raw
        .entry_price
        .as_ref()
        .ok_or(ValidationError::MissingField("entryPrice"))?
        .coerce("entryPrice")?;
    if entry_price <= 0.0 {
        return Err(ValidationError::NonPositiveEntry(entry_price));
    }

    let target_price = raw
        .target_price
        .as_ref()
        .ok_or(ValidationError::MissingField("targetPrice"))?
        .coerce("targetPrice")?;

    // A stop at or below zero means no stop configured.
    let stop_loss = match &raw.stop_loss {
        Some(n) => Some(n.coerce("stopLoss")?).filter(|v| *v > 0.0),
        None => None,
    };

    let lot_size = match &raw.lot_size {
        Some(n) => Some(n.coerce("lotSize")? as i64),
        None => None,
    };

    let strike_price = match &raw.strike_price {
        Some(n) => Some(n.coerce("strikePrice")?),
        None => None,
    };

    let option_type = match non_empty(raw.option_type.as_ref()) {
        Some(s) => Some(OptionType::from_name(s)?),
        None => None,
    };

    let expiry_date = match non_empty(raw.expiry_date.as_ref()) {
        Some(s) => Some(parse_date("expiryDate", s)?),
        None => None,
    };

    let duration = non_empty(raw.duration.as_ref()).map(str::to_string);

    let created_at = parse_timestamp(
        "createdAt",
        non_empty(raw.created_at.as_ref()).ok_or(ValidationError::MissingField("createdAt"))?,
    )?;

    let has_exit_fields = raw.exit_price.is_some()
        || raw.profit_loss_percent.is_some()
        || non_empty(raw.closed_at.as_ref()).is_some();

    // Closed trades from the legacy store carry no status field at all, only
    // the exit figures; an explicit ACTIVE status contradicting exit fields
    // is rejected rather than guessed at.
    let is_closed = match non_empty(raw.status.as_ref()).map(str::to_uppercase) {
        Some(s) if s == "CLOSED" => true,
        Some(s) if s == "ACTIVE" => {
            if has_exit_fields {
                return Err(ValidationError::ExitFieldsOnActive);
            }
            false
        }
        Some(other) => return Err(ValidationError::UnknownStatus(other)),
        None => has_exit_fields,
    };

    let exit = if is_closed {
        let exit_price = raw
            .exit_price
            .as_ref()
            .ok_or(ValidationError::MissingField("exitPrice"))?
            .coerce("exitPrice")?;
        // The persisted figure is authoritative; it is not recomputed from
        // entry/exit, so historical displayed values never drift.
        let profit_loss_percent = raw
            .profit_loss_percent
            .as_ref()
            .ok_or(ValidationError::MissingField("profitLossPercent"))?
            .coerce("profitLossPercent")?;
        let closed_at = parse_timestamp(
            "closedAt",
            non_empty(raw.closed_at.as_ref()).ok_or(ValidationError::MissingField("closedAt"))?,
        )?;
        Some(TradeExit {
            exit_price,
            profit_loss_percent,
            closed_at,
        })
    } else {
        None
    };

    Ok(TradeRecord {
        id,
        symbol,
        segment,
        action,
        entry_price,
        target_price,
        stop_loss,
        lot_size,
        strike_price,
        option_type,
        expiry_date,
        duration,
        created_at,
        exit,
    })
}

impl From<&TradeRecord> for RawTradeRecord {
    fn from(trade: &TradeRecord) -> Self {
        RawTradeRecord {
            id: Some(trade.id.clone()),
            symbol: Some(trade.symbol.clone()),
            segment: Some(trade.segment.name().to_string()),
            action: Some(trade.action.to_string()),
            entry_price: Some(RawNumber::Num(trade.entry_price)),
            target_price: Some(RawNumber::Num(trade.target_price)),
            stop_loss: trade.stop_loss.map(RawNumber::Num),
            lot_size: trade.lot_size.map(|v| RawNumber::Num(v as f64)),
            strike_price: trade.strike_price.map(RawNumber::Num),
            option_type: trade.option_type.map(|t| t.to_string()),
            expiry_date: trade.expiry_date.map(|d| d.format("%Y-%m-%d").to_string()),
            duration: trade.duration.clone(),
            status: Some(trade.status().to_string()),
            created_at: Some(trade.created_at.to_rfc3339()),
            exit_price: trade.exit.as_ref().map(|e| RawNumber::Num(e.exit_price)),
            profit_loss_percent: trade
                .exit
                .as_ref()
                .map(|e| RawNumber::Num(e.profit_loss_percent)),
            closed_at: trade.exit.as_ref().map(|e| e.closed_at.to_rfc3339()),
        }
    }
}

/// One record dropped from a batch, with the index it had in the input.
#[derive(Debug, Clone)]
pub struct SkippedRecord {
    pub index: usize,
    pub id: Option<String>,
    pub error: ValidationError,
}

#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub records: Vec<TradeRecord>,
    pub skipped: Vec<SkippedRecord>,
}

/// Normalize a whole read-model batch, skip-and-continue. Malformed records
/// land in `skipped` for the caller to log; the good ones still make it to
/// the dashboard.
pub fn normalize_batch(raws: &[RawTradeRecord]) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();
    for (index, raw) in raws.iter().enumerate() {
        match normalize(raw) {
            Ok(record) => outcome.records.push(record),
            Err(error) => outcome.skipped.push(SkippedRecord {
                index,
                id: raw.id.clone(),
                error,
            }),
        }
    }
    outcome
}
