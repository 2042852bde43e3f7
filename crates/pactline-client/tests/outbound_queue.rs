#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod common;

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use pactline_client::realtime::OutboundQueue;
use pactline_client::transport::codec::Prepared;
use pactline_client::transport::{Link, LinkEvent, CLOSE_ABNORMAL};
use pactline_client::ConnectionState;
use pactline_core::error::{PactError, Result};
use pactline_core::protocol::{Outbound, RoomRef};

use common::{accept_handshake, harness, wait_state};

/// Accepts `budget` frames, then refuses everything.
struct FlakyLink {
    budget: usize,
    written: Vec<String>,
}

#[async_trait]
impl Link for FlakyLink {
    async fn send_text(&mut self, text: String) -> Result<()> {
        if self.budget == 0 {
            return Err(PactError::Transport("socket not open".into()));
        }
        self.budget -= 1;
        self.written.push(text);
        Ok(())
    }

    async fn next_event(&mut self) -> LinkEvent {
        LinkEvent::Closed { code: CLOSE_ABNORMAL }
    }

    async fn close(&mut self, _code: u16) -> Result<()> {
        Ok(())
    }
}

fn chat(room: &RoomRef, text: &str) -> Prepared {
    Prepared::prepare(&Outbound::chat_message(room, text, "text")).unwrap()
}

#[tokio::test]
async fn flush_stops_at_first_refused_entry_and_resumes_in_order() {
    let room = RoomRef::contract("c-1");
    let mut queue = OutboundQueue::new();
    for text in ["a", "b", "c", "d"] {
        queue.enqueue(chat(&room, text));
    }

    let mut partial = FlakyLink { budget: 2, written: vec![] };
    let err = queue.flush(&mut partial).await.expect_err("third frame is refused");
    assert_eq!(err.code().as_str(), "TRANSPORT");
    assert_eq!(partial.written.len(), 2);
    assert_eq!(queue.len(), 2);

    let mut healthy = FlakyLink { budget: 10, written: vec![] };
    assert_eq!(queue.flush(&mut healthy).await.unwrap(), 2);
    assert!(queue.is_empty());

    let all: Vec<String> = partial.written.into_iter().chain(healthy.written).collect();
    let expected: Vec<String> = ["a", "b", "c", "d"].iter().map(|t| chat(&room, t).text).collect();
    assert_eq!(all, expected);
}

#[tokio::test]
async fn flush_on_closed_link_keeps_everything() {
    let room = RoomRef::contract("c-1");
    let mut queue = OutboundQueue::new();
    queue.enqueue(chat(&room, "a"));
    queue.enqueue(Prepared::prepare(&Outbound::typing(&room, true)).unwrap());

    let mut closed = FlakyLink { budget: 0, written: vec![] };
    assert!(queue.flush(&mut closed).await.is_err());
    assert_eq!(queue.pending_types(), vec!["chat_message", "typing"]);
}

#[tokio::test]
async fn chat_sent_while_connecting_is_first_frame_on_open() {
    let mut h = harness();
    h.connector.hold();

    let session = h.factory.mount(RoomRef::contract("c-1"));
    wait_state(&session, ConnectionState::Connecting).await;
    session.send_chat_message("hello", "text").unwrap();
    session.send_chat_message("again", "text").unwrap();

    h.connector.release();
    let mut peer = h.server.accept().await.unwrap();

    let first = peer.recv_json().await.unwrap();
    assert_eq!(first["type"], "chat_message");
    assert_eq!(first["data"]["message"], "hello");
    assert_eq!(peer.recv_json().await.unwrap()["data"]["message"], "again");

    let auth = peer.recv_json().await.unwrap();
    assert_eq!(auth, json!({"type": "auth", "data": {"token": "tok-1", "userAgent": common::USER_AGENT}}));
    let join = peer.recv_json().await.unwrap();
    assert_eq!(
        join,
        json!({"type": "join_room", "data": {"roomId": "c-1", "roomType": "contract", "userName": "Ana"}})
    );

    wait_state(&session, ConnectionState::Open).await;
    assert_eq!(session.stats().queued, 2);
}

#[tokio::test(start_paused = true)]
async fn sends_during_outage_flush_in_order_after_reconnect() {
    let mut h = harness();
    let session = h.factory.mount(RoomRef::contract("c-1"));
    let first = accept_handshake(&mut h.server).await;
    wait_state(&session, ConnectionState::Open).await;

    first.close(1011);
    wait_state(&session, ConnectionState::Closed).await;

    for text in ["one", "two", "three"] {
        session.send_chat_message(text, "text").unwrap();
    }
    session.upload_document(json!({"name": "nda.pdf", "size": 1024})).unwrap();

    let mut second = h.server.accept().await.unwrap();
    let mut types = vec![];
    let mut messages = vec![];
    for _ in 0..6 {
        let frame = second.recv_json().await.unwrap();
        types.push(frame["type"].as_str().unwrap().to_owned());
        if let Some(m) = frame["data"]["message"].as_str() {
            messages.push(m.to_owned());
        }
    }
    assert_eq!(
        types,
        vec!["chat_message", "chat_message", "chat_message", "document_upload", "auth", "join_room"]
    );
    assert_eq!(messages, vec!["one", "two", "three"]);

    wait_state(&session, ConnectionState::Open).await;
    let attempts = h.connector.attempts();
    assert_eq!(attempts[1] - attempts[0], Duration::from_millis(1000));
    drop(first);
}
