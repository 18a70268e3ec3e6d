//! New-trade alert dedupe and push payload construction.
//!
//! The live-update collaborator delivers successive full snapshots of the
//! active trade set. [`NewTradeDetector`] turns that stream into
//! notify-once events: the first snapshot primes the tracked set without
//! emitting anything, and every later snapshot emits exactly the IDs that
//! were not in the previous one. Snapshots must be fed in arrival order,
//! one at a time.

use crate::domain::trade::TradeRecord;
use crate::domain::user::UserRecord;
use serde::Serialize;
use std::collections::HashSet;

/// Tracks which trade IDs have been seen across snapshots.
///
/// Explicit, injectable state: whoever drives the live-update loop owns one
/// of these and calls [`process_snapshot`](Self::process_snapshot) per
/// delivery.
#[derive(Debug, Default)]
pub struct NewTradeDetector {
    tracked: Option<HashSet<String>>,
}

impl NewTradeDetector {
    pub fn new() -> Self {
        NewTradeDetector::default()
    }

    /// Whether a first snapshot has been absorbed yet.
    pub fn is_primed(&self) -> bool {
        self.tracked.is_some()
    }

    /// Absorb one snapshot of the current active trade IDs and return the
    /// newly appeared ones, in arrival order.
    ///
    /// The first snapshot returns nothing: pre-existing trades on initial
    /// load are not news. The tracked set is replaced wholesale each call,
    /// never unioned, so closed trades drop out instead of lingering.
    pub fn process_snapshot(&mut self, ids: Vec<String>) -> Vec<String> {
        let incoming: HashSet<String> = ids.iter().cloned().collect();
        let fresh = match &self.tracked {
            None => Vec::new(),
            Some(previous) => {
                let mut emitted = HashSet::new();
                ids.iter()
                    .filter(|id| !previous.contains(*id) && emitted.insert((*id).clone()))
                    .cloned()
                    .collect()
            }
        };
        self.tracked = Some(incoming);
        fresh
    }
}

/// One push payload for the delivery collaborator. Serializes to the wire
/// shape the relay forwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushMessage {
    pub to: String,
    pub title: String,
    pub body: String,
}

/// Alert text for one newly posted trade.
pub fn alert_body(trade: &TradeRecord) -> String {
    format!("New trade posted: {} {}", trade.symbol, trade.action)
}

/// Fan one new trade out to every subscriber who should hear about it:
/// ACTIVE status and a registered, non-empty push token.
pub fn build_push_messages(
    trade: &TradeRecord,
    users: &[UserRecord],
    title: &str,
) -> Vec<PushMessage> {
    let body = alert_body(trade);
    users
        .iter()
        .filter(|user| user.status.can_receive_push())
        .filter_map(|user| user.push_token.as_deref())
        .filter(|token| !token.trim().is_empty())
        .map(|token| PushMessage {
            to: token.to_string(),
            title: title.to_string(),
            body: body.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trade::{Segment, TradeAction};
    use crate::domain::user::UserStatus;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn ids(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn trade(symbol: &str) -> TradeRecord {
        TradeRecord {
            id: "t1".into(),
            symbol: symbol.into(),
            segment: Segment::Equity,
            action: TradeAction::Buy,
            entry_price: 100.0,
            target_price: 110.0,
            stop_loss: Some(95.0),
            lot_size: None,
            strike_price: None,
            option_type: None,
            expiry_date: None,
            duration: None,
            created_at: Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).unwrap(),
            exit: None,
        }
    }

    fn user(id: &str, status: UserStatus, token: Option<&str>) -> UserRecord {
        UserRecord {
            id: id.into(),
            phone: format!("+91{}", id),
            status,
            push_token: token.map(str::to_string),
            name: None,
            created_at: None,
            subscription_end_date: None,
        }
    }

    #[test]
    fn first_snapshot_emits_nothing() {
        let mut detector = NewTradeDetector::new();
        assert!(!detector.is_primed());
        let fresh = detector.process_snapshot(ids(&["A", "B", "C"]));
        assert!(fresh.is_empty());
        assert!(detector.is_primed());
    }

    #[test]
    fn snapshot_sequence_emits_once_per_new_id() {
        let mut detector = NewTradeDetector::new();

        assert_eq!(detector.process_snapshot(ids(&["A", "B", "C"])), ids(&[]));
        assert_eq!(
            detector.process_snapshot(ids(&["A", "B", "C", "D"])),
            ids(&["D"])
        );
        // A removed: no events, and A is no longer tracked.
        assert_eq!(detector.process_snapshot(ids(&["B", "C", "D"])), ids(&[]));
        // E is new; A stays gone and must not resurrect an event.
        assert_eq!(
            detector.process_snapshot(ids(&["B", "C", "D", "E"])),
            ids(&["E"])
        );
    }

    #[test]
    fn removed_then_identical_snapshot_is_quiet() {
        let mut detector = NewTradeDetector::new();
        detector.process_snapshot(ids(&["A", "B"]));
        detector.process_snapshot(ids(&["B"]));
        assert_eq!(detector.process_snapshot(ids(&["B"])), ids(&[]));
    }

    #[test]
    fn duplicate_ids_within_a_snapshot_emit_once() {
        let mut detector = NewTradeDetector::new();
        detector.process_snapshot(ids(&["A"]));
        assert_eq!(detector.process_snapshot(ids(&["A", "B", "B"])), ids(&["B"]));
    }

    #[test]
    fn emission_preserves_arrival_order() {
        let mut detector = NewTradeDetector::new();
        detector.process_snapshot(ids(&["A"]));
        assert_eq!(
            detector.process_snapshot(ids(&["X", "A", "Y", "Z"])),
            ids(&["X", "Y", "Z"])
        );
    }

    #[test]
    fn messages_go_to_active_users_with_tokens_only() {
        let users = vec![
            user("1", UserStatus::Active, Some("tok-1")),
            user("2", UserStatus::Active, None),
            user("3", UserStatus::Active, Some("")),
            user("4", UserStatus::Free, Some("tok-4")),
            user("5", UserStatus::Blocked, Some("tok-5")),
            user("6", UserStatus::Active, Some("tok-6")),
        ];
        let messages = build_push_messages(&trade("INFY"), &users, "New Trade Alert");
        let targets: Vec<&str> = messages.iter().map(|m| m.to.as_str()).collect();
        assert_eq!(targets, vec!["tok-1", "tok-6"]);
    }

    #[test]
    fn message_body_carries_display_fields() {
        let users = vec![user("1", UserStatus::Active, Some("tok-1"))];
        let messages = build_push_messages(&trade("INFY"), &users, "New Trade Alert");
        assert_eq!(messages[0].title, "New Trade Alert");
        assert_eq!(messages[0].body, "New trade posted: INFY BUY");
    }

    proptest! {
        // Feeding the same snapshot twice never emits on the second pass.
        #[test]
        fn repeated_snapshot_is_always_quiet(
            snapshot in prop::collection::vec("[a-z]{1,6}", 0..20),
        ) {
            let mut detector = NewTradeDetector::new();
            detector.process_snapshot(snapshot.clone());
            prop_assert!(detector.process_snapshot(snapshot).is_empty());
        }
    }
}
