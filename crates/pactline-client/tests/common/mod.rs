//! Shared fixtures: memory transport harness and envelope builders.

#![allow(dead_code)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use serde_json::{json, Value};

use pactline_client::transport::memory::{MemoryConnector, MemoryPeer, MemoryServer};
use pactline_client::{AuthProvider, ClientConfig, ConnectionState, Session, SessionFactory, StaticAuth};
use pactline_core::protocol::Participant;

pub const USER_AGENT: &str = "pactline/test";

pub fn config() -> ClientConfig {
    let mut cfg = ClientConfig::for_endpoint("ws://memory.test/realtime");
    cfg.client.user_agent = USER_AGENT.into();
    cfg
}

pub struct Harness {
    pub factory: SessionFactory,
    pub connector: MemoryConnector,
    pub server: MemoryServer,
}

pub fn harness() -> Harness {
    harness_with(config(), Arc::new(StaticAuth::bearer("tok-1", "Ana")))
}

pub fn harness_with(cfg: ClientConfig, auth: Arc<dyn AuthProvider>) -> Harness {
    let (connector, server) = MemoryConnector::new();
    let factory = SessionFactory::new(cfg, Arc::new(connector.clone()), auth);
    Harness {
        factory,
        connector,
        server,
    }
}

/// Accept the next link and consume the auth + join_room greeting.
pub async fn accept_handshake(server: &mut MemoryServer) -> MemoryPeer {
    let mut peer = server.accept().await.expect("client never dialed");
    let auth = peer.recv_json().await.expect("auth frame");
    assert_eq!(auth["type"], "auth");
    let join = peer.recv_json().await.expect("join_room frame");
    assert_eq!(join["type"], "join_room");
    peer
}

pub async fn wait_state(session: &Session, want: ConnectionState) {
    let mut rx = session.watch_state();
    rx.wait_for(|s| *s == want).await.expect("session task gone");
}

pub fn person(user_id: &str, name: &str) -> Value {
    serde_json::to_value(Participant::new(user_id, name)).unwrap()
}

pub fn room_joined(people: &[(&str, &str)]) -> Value {
    let participants: Vec<Value> = people.iter().map(|(id, n)| person(id, n)).collect();
    json!({ "type": "room_joined", "data": { "roomId": "c-1", "participants": participants } })
}

pub fn user_joined(who: (&str, &str), people: &[(&str, &str)]) -> Value {
    let participants: Vec<Value> = people.iter().map(|(id, n)| person(id, n)).collect();
    json!({ "type": "user_joined", "data": { "userInfo": person(who.0, who.1), "participants": participants } })
}

pub fn user_left(user_id: &str, people: &[(&str, &str)]) -> Value {
    let participants: Vec<Value> = people.iter().map(|(id, n)| person(id, n)).collect();
    json!({ "type": "user_left", "data": { "userId": user_id, "participants": participants } })
}

pub fn typing_updated(user_id: &str, is_typing: bool) -> Value {
    json!({ "type": "typing_updated", "data": { "userId": user_id, "isTyping": is_typing } })
}

pub fn typing_stopped(user_id: &str) -> Value {
    json!({ "type": "typing_stopped", "data": { "userId": user_id } })
}
