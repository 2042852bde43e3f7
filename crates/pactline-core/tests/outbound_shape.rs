//! Outbound envelopes must match the server's `{type, data}` field naming.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use serde_json::{json, Value};

use pactline_core::protocol::{Outbound, RoomRef};

fn wire(out: &Outbound) -> Value {
    serde_json::from_str(&out.encode().unwrap()).unwrap()
}

#[test]
fn auth_uses_camel_case_fields() {
    let out = Outbound::Auth {
        token: "t-1".into(),
        user_agent: "pactline/test".into(),
    };
    assert_eq!(
        wire(&out),
        json!({"type": "auth", "data": {"token": "t-1", "userAgent": "pactline/test"}})
    );
}

#[test]
fn room_scoped_messages_carry_room_id_and_type() {
    let room = RoomRef::contract("c-7");

    assert_eq!(
        wire(&Outbound::join_room(&room, "Ana")),
        json!({"type": "join_room", "data": {"roomId": "c-7", "roomType": "contract", "userName": "Ana"}})
    );
    assert_eq!(
        wire(&Outbound::chat_message(&room, "hi", "text")),
        json!({"type": "chat_message", "data": {"roomId": "c-7", "roomType": "contract", "message": "hi", "messageType": "text"}})
    );
    assert_eq!(
        wire(&Outbound::typing(&room, true)),
        json!({"type": "typing", "data": {"roomId": "c-7", "roomType": "contract", "isTyping": true}})
    );
}

#[test]
fn contract_update_and_sync_request() {
    let update = Outbound::ContractUpdate {
        contract_id: "c-7".into(),
        update_type: "clause_edit".into(),
        update_data: json!({"clause": 2, "text": "net 30"}),
    };
    let v = wire(&update);
    assert_eq!(v["type"], "contract_update");
    assert_eq!(v["data"]["contractId"], "c-7");
    assert_eq!(v["data"]["updateType"], "clause_edit");
    assert_eq!(v["data"]["updateData"]["text"], "net 30");

    let sync = Outbound::SyncRequest { contract_id: "c-7".into() };
    assert_eq!(sync.msg_type(), "sync_request");
    assert_eq!(wire(&sync), json!({"type": "sync_request", "data": {"contractId": "c-7"}}));
}
