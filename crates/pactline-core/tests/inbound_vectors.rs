//! Inbound envelope vector tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::fs;

use pactline_core::protocol::Inbound;

mod vector_loader;
use vector_loader::TestVector;

fn load(name: &str) -> TestVector {
    let s = fs::read_to_string(format!("tests/vectors/{name}")).unwrap();
    serde_json::from_str(&s).unwrap()
}

#[test]
fn inbound_vectors() {
    let files = [
        "room_joined.json",
        "user_left.json",
        "typing_updated.json",
        "connected_no_data.json",
        "unknown_type.json",
        "user_joined_missing_snapshot.json",
        "typing_updated_bad_flag.json",
        "not_json.json",
    ];

    for f in files {
        let v = load(f);
        let res = Inbound::decode(&v.frame.text());

        if let Some(err) = v.expect_error {
            let e = res.expect_err("expected error");
            assert_eq!(e.code().as_str(), err.code, "vector={}", v.description);
            continue;
        }

        let msg = res.expect("expected decoded envelope");
        let ex = v.expect.expect("missing expect block");

        assert_eq!(msg.msg_type(), ex["type"].as_str().unwrap(), "vector={}", v.description);

        let unknown = ex.get("unknown").and_then(|u| u.as_bool()).unwrap_or(false);
        assert_eq!(matches!(msg, Inbound::Unknown(_)), unknown, "vector={}", v.description);

        match ex.get("participants").and_then(|p| p.as_u64()) {
            Some(n) => {
                let snapshot = msg.participants().expect("snapshot expected");
                assert_eq!(snapshot.len() as u64, n, "vector={}", v.description);
            }
            None => assert!(msg.participants().is_none(), "vector={}", v.description),
        }
    }
}

#[test]
fn room_joined_defaults_online_and_not_typing() {
    let v = load("room_joined.json");
    let Inbound::RoomJoined(joined) = Inbound::decode(&v.frame.text()).unwrap() else {
        panic!("expected room_joined");
    };
    assert_eq!(joined.room_id.as_deref(), Some("contract-42"));
    let bob = &joined.participants[1];
    assert_eq!(bob.user_id, "u2");
    assert!(bob.is_online);
    assert!(!bob.is_typing);
}

#[test]
fn typing_updated_fields() {
    let msg = Inbound::decode(r#"{"type":"typing_updated","data":{"userId":"u9","isTyping":true}}"#).unwrap();
    match msg {
        Inbound::TypingUpdated(t) => {
            assert_eq!(t.user_id, "u9");
            assert!(t.is_typing);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn contract_updated_keeps_optional_payload() {
    let msg = Inbound::decode(
        r#"{"type":"contract_updated","data":{"timestamp":"2024-05-01T10:00:00Z","userName":"Ana","updateType":"clause","updateData":{"clause":3}}}"#,
    )
    .unwrap();
    let Inbound::ContractUpdated(c) = msg else {
        panic!("expected contract_updated");
    };
    assert_eq!(c.user_name, "Ana");
    assert_eq!(c.update_type.as_deref(), Some("clause"));
    assert_eq!(c.update_data.unwrap()["clause"], 3);
}
