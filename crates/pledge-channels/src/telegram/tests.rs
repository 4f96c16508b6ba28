use super::polling::map_update;
use super::send::inline_keyboard;
use super::types::{TgResponse, TgUpdate};
use pledge_core::message::{InboundEvent, QuickAction, ReplyHandle};

fn update(json: &str) -> TgUpdate {
    serde_json::from_str(json).unwrap()
}

#[test]
fn test_text_message_maps_to_text_event() {
    let u = update(
        r#"{"update_id":1,"message":{"message_id":5,"from":{"id":42,"first_name":"Ada"},
            "chat":{"id":42,"type":"private"},"text":"am: run, read"}}"#,
    );
    let event = map_update(u, &[]).unwrap();
    assert_eq!(
        event,
        InboundEvent::Text {
            identity: "42".into(),
            text: "am: run, read".into(),
            reply: ReplyHandle::new("42"),
        }
    );
}

#[test]
fn test_start_maps_to_follow() {
    let u = update(
        r#"{"update_id":2,"message":{"message_id":6,"from":{"id":7,"first_name":"Bo"},
            "chat":{"id":7,"type":"private"},"text":"/start@pledge_bot"}}"#,
    );
    assert!(matches!(
        map_update(u, &[]),
        Some(InboundEvent::Follow { ref identity, .. }) if identity == "7"
    ));
}

#[test]
fn test_blocked_bot_maps_to_unfollow() {
    let u = update(
        r#"{"update_id":3,"my_chat_member":{"chat":{"id":7,"type":"private"},
            "from":{"id":7,"first_name":"Bo"},"new_chat_member":{"status":"kicked"}}}"#,
    );
    assert_eq!(
        map_update(u, &[]),
        Some(InboundEvent::Unfollow {
            identity: "7".into()
        })
    );
}

#[test]
fn test_rejoin_is_ignored() {
    let u = update(
        r#"{"update_id":3,"my_chat_member":{"chat":{"id":7,"type":"private"},
            "from":{"id":7,"first_name":"Bo"},"new_chat_member":{"status":"member"}}}"#,
    );
    assert!(map_update(u, &[]).is_none());
}

#[test]
fn test_callback_maps_to_menu_selection() {
    let u = update(
        r#"{"update_id":4,"callback_query":{"id":"cb1","from":{"id":9,"first_name":"Cy"},
            "message":{"message_id":1,"chat":{"id":9,"type":"private"}},
            "data":"settings:tone"}}"#,
    );
    assert_eq!(
        map_update(u, &[]),
        Some(InboundEvent::MenuSelection {
            identity: "9".into(),
            key: "settings:tone".into(),
            reply: ReplyHandle::new("9"),
        })
    );
}

#[test]
fn test_unauthorized_and_group_messages_are_dropped() {
    let private = r#"{"update_id":5,"message":{"message_id":1,"from":{"id":1,"first_name":"X"},
        "chat":{"id":1,"type":"private"},"text":"hi"}}"#;
    assert!(map_update(update(private), &[2, 3]).is_none());
    assert!(map_update(update(private), &[1]).is_some());

    let group = r#"{"update_id":6,"message":{"message_id":1,"from":{"id":1,"first_name":"X"},
        "chat":{"id":-100,"type":"group"},"text":"hi"}}"#;
    assert!(map_update(update(group), &[]).is_none());
}

#[test]
fn test_non_text_message_is_dropped() {
    let u = update(
        r#"{"update_id":7,"message":{"message_id":1,"from":{"id":1,"first_name":"X"},
            "chat":{"id":1,"type":"private"}}}"#,
    );
    assert!(map_update(u, &[]).is_none());
}

#[test]
fn test_inline_keyboard_rows() {
    let actions = vec![
        QuickAction::new("Morning", "settings:morning"),
        QuickAction::new("Evening", "settings:evening"),
        QuickAction::new("Tone", "settings:tone"),
    ];
    let kb = inline_keyboard(&actions);
    let rows = kb["inline_keyboard"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].as_array().unwrap().len(), 2);
    assert_eq!(rows[1][0]["callback_data"], "settings:tone");
    assert_eq!(rows[0][0]["text"], "Morning");
}

#[test]
fn test_error_response_parsing() {
    let resp: TgResponse<Vec<TgUpdate>> =
        serde_json::from_str(r#"{"ok":false,"description":"Unauthorized"}"#).unwrap();
    assert!(!resp.ok);
    assert_eq!(resp.description.as_deref(), Some("Unauthorized"));
    assert!(resp.result.is_none());
}
