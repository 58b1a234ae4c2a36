//! Property tests for relay event parsing

use palchat::shared::ClientEvent;
use proptest::prelude::*;
use uuid::Uuid;

proptest! {
    #[test]
    fn parse_never_panics(frame in ".*") {
        let _ = ClientEvent::parse(&frame);
    }

    #[test]
    fn chat_with_text_parses(from in any::<u128>(), to in any::<u128>(), text in "[a-zA-Z0-9 ]*[a-zA-Z0-9][a-zA-Z0-9 ]*") {
        let from = Uuid::from_u128(from);
        let to = Uuid::from_u128(to);
        let frame = serde_json::json!({
            "type": "chat",
            "from": from,
            "to": to,
            "messageText": text,
        })
        .to_string();

        let event = ClientEvent::parse(&frame).unwrap();
        prop_assert_eq!(event, ClientEvent::Chat { from, to, message_text: text });
    }

    #[test]
    fn register_with_bad_id_is_rejected(id in "[g-z]{1,36}") {
        let frame = serde_json::json!({ "type": "register", "userId": id }).to_string();
        prop_assert!(ClientEvent::parse(&frame).is_err());
    }
}
