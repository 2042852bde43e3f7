//! Transport layer (WebSocket).
//!
//! The connection manager only sees `Connector` and `Link`; `ws` backs them
//! with tokio-tungstenite, `memory` with in-process channels for tests and demos.
//! Every link the manager holds is wrapped in a `deadline::WriteDeadline`.
//! The codec serializes outbound envelopes once and decodes inbound frames once.

use async_trait::async_trait;

use pactline_core::error::Result;

pub mod codec;
pub mod deadline;
pub mod memory;
pub mod ws;

/// Normal closure; suppresses reconnect.
pub const CLOSE_NORMAL: u16 = 1000;
/// Close frame without a status code.
pub const CLOSE_NO_STATUS: u16 = 1005;
/// Connection dropped without a close frame.
pub const CLOSE_ABNORMAL: u16 = 1006;

/// Event surfaced by an open link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    /// Text frame.
    Text(String),
    /// Socket-level error. The link may still deliver more events.
    Error(String),
    /// Link is closed; no further events follow.
    Closed { code: u16 },
}

/// One open socket.
///
/// `next_event` must be cancel-safe: the manager polls it inside `select!`.
#[async_trait]
pub trait Link: Send {
    async fn send_text(&mut self, text: String) -> Result<()>;
    async fn next_event(&mut self) -> LinkEvent;
    async fn close(&mut self, code: u16) -> Result<()>;
}

/// Opens links to an endpoint.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, endpoint: &str) -> Result<Box<dyn Link>>;
}
