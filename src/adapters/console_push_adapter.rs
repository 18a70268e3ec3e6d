//! Console push delivery adapter.
//!
//! Prints one JSON object per message to stdout, in the wire shape the
//! relay endpoint forwards to the push gateway. Stands in for the gateway
//! call itself, which is out of scope.

use crate::domain::alerts::PushMessage;
use crate::domain::error::CalldeskError;
use crate::ports::push_port::PushPort;

#[derive(Debug, Default)]
pub struct ConsolePushAdapter;

impl PushPort for ConsolePushAdapter {
    fn deliver(&self, messages: &[PushMessage]) -> Result<(), CalldeskError> {
        for message in messages {
            let line = serde_json::to_string(message).map_err(|e| CalldeskError::Push {
                reason: e.to_string(),
            })?;
            println!("{line}");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivery_succeeds_for_a_batch() {
        let messages = vec![PushMessage {
            to: "tok-1".into(),
            title: "New Trade Alert".into(),
            body: "New trade posted: INFY BUY".into(),
        }];
        assert!(ConsolePushAdapter.deliver(&messages).is_ok());
    }

    #[test]
    fn message_serializes_to_wire_shape() {
        let message = PushMessage {
            to: "tok-1".into(),
            title: "New Trade Alert".into(),
            body: "New trade posted: INFY BUY".into(),
        };
        let json = serde_json::to_string(&message).unwrap();
        assert_eq!(
            json,
            r#"{"to":"tok-1","title":"New Trade Alert","body":"New trade posted: INFY BUY"}"#
        );
    }
}
