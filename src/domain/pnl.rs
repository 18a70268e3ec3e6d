//! Profit/loss percentage calculations.
//!
//! All functions are pure. `entry <= 0` can never occur for a well-formed
//! [`TradeRecord`](crate::domain::trade::TradeRecord), so the guard here is
//! defensive rather than an expected path.

use crate::domain::error::ValidationError;

/// Round to two decimal places, halves away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn check_entry(entry: f64) -> Result<(), ValidationError> {
    if !(entry > 0.0) {
        return Err(ValidationError::NonPositiveEntry(entry));
    }
    Ok(())
}

/// Percentage move from entry to target for an open trade. Unrounded; the
/// presentation layer formats it.
pub fn potential_gain_pct(entry: f64, target: f64) -> Result<f64, ValidationError> {
    check_entry(entry)?;
    Ok((target - entry) / entry * 100.0)
}

/// Percentage loss if the stop is hit. A stop at or below zero means no
/// stop is configured: risk is undefined, never treated as zero.
pub fn risk_pct(entry: f64, stop_loss: f64) -> Result<Option<f64>, ValidationError> {
    check_entry(entry)?;
    if stop_loss <= 0.0 {
        return Ok(None);
    }
    Ok(Some((entry - stop_loss) / entry * 100.0))
}

/// Realized P/L percentage at close, rounded to two decimals. The rounded
/// value is the one persisted on the record; aggregation reads it back
/// instead of recomputing from entry/exit.
pub fn realized_pct(entry: f64, exit: f64) -> Result<f64, ValidationError> {
    check_entry(entry)?;
    Ok(round2((exit - entry) / entry * 100.0))
}
