//! Canonical trade record types.
//!
//! A [`TradeRecord`] is the post-normalization shape every downstream
//! computation consumes. Closed-state fields live in [`TradeExit`], so a
//! record is CLOSED exactly when `exit` is present and there is no way to
//! represent an active record carrying realized figures.

use crate::domain::error::ValidationError;
use crate::domain::pnl;
use chrono::{DateTime, NaiveDate, Utc};

/// Trade instrument category. Legacy equity-only records omit this field
/// and normalize to `Equity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    Equity,
    Futures,
    Options,
}

impl Segment {
    /// Strict lookup for operator-supplied names. Unknown names are `None`;
    /// the equity default-fill applies only to stored records crossing the
    /// normalizer.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "equity" => Some(Segment::Equity),
            "futures" => Some(Segment::Futures),
            "options" => Some(Segment::Options),
            _ => None,
        }
    }

    /// Default-fill lookup for stored records: absent or unrecognized
    /// segment values map to `Equity`.
    pub fn from_raw(raw: Option<&str>) -> Self {
        raw.and_then(Segment::from_name).unwrap_or(Segment::Equity)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Segment::Equity => "equity",
            Segment::Futures => "futures",
            Segment::Options => "options",
        }
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeAction {
    Buy,
    Sell,
}

impl TradeAction {
    pub fn from_name(name: &str) -> Result<Self, ValidationError> {
        match name.trim().to_uppercase().as_str() {
            "BUY" => Ok(TradeAction::Buy),
            "SELL" => Ok(TradeAction::Sell),
            _ => Err(ValidationError::UnknownAction(name.to_string())),
        }
    }
}

impl std::fmt::Display for TradeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeAction::Buy => f.write_str("BUY"),
            TradeAction::Sell => f.write_str("SELL"),
        }
    }
}

/// Call or put, relevant only for options records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionType {
    Ce,
    Pe,
}

impl OptionType {
    pub fn from_name(name: &str) -> Result<Self, ValidationError> {
        match name.trim().to_uppercase().as_str() {
            "CE" => Ok(OptionType::Ce),
            "PE" => Ok(OptionType::Pe),
            _ => Err(ValidationError::UnknownOptionType(name.to_string())),
        }
    }
}

impl std::fmt::Display for OptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionType::Ce => f.write_str("CE"),
            OptionType::Pe => f.write_str("PE"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeStatus {
    Active,
    Closed,
}

impl std::fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeStatus::Active => f.write_str("ACTIVE"),
            TradeStatus::Closed => f.write_str("CLOSED"),
        }
    }
}

/// Realized figures, set exactly once at close time and immutable after.
///
/// `profit_loss_percent` is the rounded figure computed at close; downstream
/// aggregation reads it back rather than recomputing from entry/exit, so
/// historical displayed values never drift.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeExit {
    pub exit_price: f64,
    pub profit_loss_percent: f64,
    pub closed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub id: String,
    pub symbol: String,
    pub segment: Segment,
    pub action: TradeAction,
    pub entry_price: f64,
    pub target_price: f64,
    /// `None` means no stop configured; risk is undefined, not zero.
    pub stop_loss: Option<f64>,
    pub lot_size: Option<i64>,
    pub strike_price: Option<f64>,
    pub option_type: Option<OptionType>,
    pub expiry_date: Option<NaiveDate>,
    pub duration: Option<String>,
    pub created_at: DateTime<Utc>,
    pub exit: Option<TradeExit>,
}

impl TradeRecord {
    pub fn status(&self) -> TradeStatus {
        if self.exit.is_some() {
            TradeStatus::Closed
        } else {
            TradeStatus::Active
        }
    }

    pub fn is_closed(&self) -> bool {
        self.exit.is_some()
    }

    /// Percentage move from entry to target.
    pub fn potential_gain_pct(&self) -> Result<f64, ValidationError> {
        pnl::potential_gain_pct(self.entry_price, self.target_price)
    }

    /// Percentage loss if the stop is hit, or `None` when no stop is set.
    pub fn risk_pct(&self) -> Result<Option<f64>, ValidationError> {
        match self.stop_loss {
            Some(stop) => pnl::risk_pct(self.entry_price, stop),
            None => Ok(None),
        }
    }

    /// One-way ACTIVE → CLOSED transition. Computes the realized P/L,
    /// freezes the rounded figure, and errors on a record that is already
    /// closed; there is no reopen path.
    pub fn close(
        &self,
        exit_price: f64,
        closed_at: DateTime<Utc>,
    ) -> Result<TradeRecord, ValidationError> {
        if self.exit.is_some() {
            return Err(ValidationError::AlreadyClosed);
        }
        let profit_loss_percent = pnl::realized_pct(self.entry_price, exit_price)?;
        let mut closed = self.clone();
        closed.exit = Some(TradeExit {
            exit_price,
            profit_loss_percent,
            closed_at,
        });
        Ok(closed)
    }
}
