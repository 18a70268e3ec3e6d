//! Subscription expiry countdown and severity tiers.
//!
//! Day counting is calendar-based: both the stored end date and "today" are
//! taken as whole days before differencing, so an expiry at any time today
//! is exactly 0 days away regardless of the hour.

use crate::domain::error::ValidationError;
use crate::domain::user::{UserRecord, UserStatus};
use chrono::{DateTime, NaiveDate, Utc};

pub const CRITICAL_WINDOW_DAYS: i64 = 7;
pub const WARNING_WINDOW_DAYS: i64 = 15;

/// Severity bucket for the subscription badge. Evaluated in fixed order,
/// first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryTier {
    Expired,
    Critical,
    Warning,
    Healthy,
}

impl ExpiryTier {
    pub fn from_days(days: i64) -> Self {
        if days <= 0 {
            ExpiryTier::Expired
        } else if days <= CRITICAL_WINDOW_DAYS {
            ExpiryTier::Critical
        } else if days <= WARNING_WINDOW_DAYS {
            ExpiryTier::Warning
        } else {
            ExpiryTier::Healthy
        }
    }
}

impl std::fmt::Display for ExpiryTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpiryTier::Expired => f.write_str("EXPIRED"),
            ExpiryTier::Critical => f.write_str("CRITICAL"),
            ExpiryTier::Warning => f.write_str("WARNING"),
            ExpiryTier::Healthy => f.write_str("HEALTHY"),
        }
    }
}

/// Parse a stored subscription end date: RFC 3339 instant or plain date.
/// An instant is pinned to its UTC calendar date so every surface counts
/// the same day.
pub fn parse_end_date(value: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc).date_naive());
    }
    Err(ValidationError::InvalidTimestamp {
        field: "subscriptionEndDate",
        value: value.to_string(),
    })
}

/// Whole days from `today` to `end_date`; 0 for the same day, negative once
/// past.
pub fn days_remaining(end_date: NaiveDate, today: NaiveDate) -> i64 {
    (end_date - today).num_days()
}

/// Derived countdown state for one ACTIVE subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub end_date: NaiveDate,
    pub days_left: i64,
    pub tier: ExpiryTier,
}

impl Countdown {
    pub fn new(end_date: NaiveDate, today: NaiveDate) -> Self {
        let days_left = days_remaining(end_date, today);
        Countdown {
            end_date,
            days_left,
            tier: ExpiryTier::from_days(days_left),
        }
    }

    /// The attention/blink UI state: on only inside the critical window.
    /// Already-expired subscriptions show the expired badge without
    /// blinking.
    pub fn blinking(&self) -> bool {
        self.tier == ExpiryTier::Critical
    }
}

/// Evaluate a user's countdown. Non-ACTIVE users and ACTIVE users without a
/// stored end date have no countdown; that is a sentinel, not an error and
/// not EXPIRED.
pub fn evaluate(user: &UserRecord, today: NaiveDate) -> Result<Option<Countdown>, ValidationError> {
    if user.status != UserStatus::Active {
        return Ok(None);
    }
    let Some(end) = user
        .subscription_end_date
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    else {
        return Ok(None);
    };
    let end_date = parse_end_date(end)?;
    Ok(Some(Countdown::new(end_date, today)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn active_user(end: Option<&str>) -> UserRecord {
        UserRecord {
            id: "u1".into(),
            phone: "+919876543210".into(),
            status: UserStatus::Active,
            push_token: None,
            name: None,
            created_at: None,
            subscription_end_date: end.map(str::to_string),
        }
    }

    #[test]
    fn same_day_is_zero_regardless_of_hour() {
        let today = date(2025, 8, 5);
        assert_eq!(
            days_remaining(parse_end_date("2025-08-05T23:59:59Z").unwrap(), today),
            0
        );
        assert_eq!(
            days_remaining(parse_end_date("2025-08-05T00:00:00.000Z").unwrap(), today),
            0
        );
        assert_eq!(days_remaining(parse_end_date("2025-08-05").unwrap(), today), 0);
    }

    #[test]
    fn past_dates_go_negative() {
        assert_eq!(days_remaining(date(2025, 8, 1), date(2025, 8, 5)), -4);
    }

    #[test]
    fn tier_boundaries() {
        assert_eq!(ExpiryTier::from_days(-3), ExpiryTier::Expired);
        assert_eq!(ExpiryTier::from_days(0), ExpiryTier::Expired);
        assert_eq!(ExpiryTier::from_days(1), ExpiryTier::Critical);
        assert_eq!(ExpiryTier::from_days(7), ExpiryTier::Critical);
        assert_eq!(ExpiryTier::from_days(8), ExpiryTier::Warning);
        assert_eq!(ExpiryTier::from_days(15), ExpiryTier::Warning);
        assert_eq!(ExpiryTier::from_days(16), ExpiryTier::Healthy);
        assert_eq!(ExpiryTier::from_days(365), ExpiryTier::Healthy);
    }

    #[test]
    fn blink_only_in_critical_window() {
        let today = date(2025, 8, 5);
        assert!(Countdown::new(date(2025, 8, 8), today).blinking());
        assert!(Countdown::new(date(2025, 8, 12), today).blinking());
        assert!(!Countdown::new(date(2025, 8, 13), today).blinking());
        assert!(!Countdown::new(date(2025, 8, 5), today).blinking());
        assert!(!Countdown::new(date(2025, 7, 1), today).blinking());
    }

    #[test]
    fn evaluate_non_active_user_has_no_countdown() {
        let mut user = active_user(Some("2025-12-31"));
        user.status = UserStatus::Free;
        assert_eq!(evaluate(&user, date(2025, 8, 5)).unwrap(), None);
        user.status = UserStatus::Blocked;
        assert_eq!(evaluate(&user, date(2025, 8, 5)).unwrap(), None);
    }

    #[test]
    fn evaluate_active_without_end_date_is_unknown() {
        assert_eq!(evaluate(&active_user(None), date(2025, 8, 5)).unwrap(), None);
        assert_eq!(
            evaluate(&active_user(Some("  ")), date(2025, 8, 5)).unwrap(),
            None
        );
    }

    #[test]
    fn evaluate_active_with_end_date() {
        let countdown = evaluate(&active_user(Some("2025-08-20")), date(2025, 8, 5))
            .unwrap()
            .unwrap();
        assert_eq!(countdown.days_left, 15);
        assert_eq!(countdown.tier, ExpiryTier::Warning);
    }

    #[test]
    fn evaluate_rejects_junk_date() {
        assert!(evaluate(&active_user(Some("next tuesday")), date(2025, 8, 5)).is_err());
    }
}
