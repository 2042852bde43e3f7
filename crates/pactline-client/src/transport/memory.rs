//! In-process transport.
//!
//! `MemoryConnector` hands every accepted link's far end to a `MemoryServer` as a
//! `MemoryPeer`, which can read what the client wrote and inject frames, errors
//! and closes. Combined with paused tokio time this drives the connection
//! manager deterministically.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{mpsc, Notify};
use tokio::time::Instant;

use pactline_core::error::{PactError, Result};

use super::{Connector, Link, LinkEvent, CLOSE_ABNORMAL};

/// What the client wrote to a memory link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerFrame {
    Text(String),
    Close(u16),
}

#[derive(Debug, Default)]
struct Dialer {
    refuse_remaining: usize,
    refuse_all: bool,
    held: bool,
    attempts: Vec<Instant>,
}

#[derive(Clone)]
pub struct MemoryConnector {
    dialer: Arc<Mutex<Dialer>>,
    released: Arc<Notify>,
    peers: mpsc::UnboundedSender<MemoryPeer>,
}

/// Accept side of a `MemoryConnector`.
pub struct MemoryServer {
    peers: mpsc::UnboundedReceiver<MemoryPeer>,
}

impl MemoryConnector {
    pub fn new() -> (Self, MemoryServer) {
        let (tx, rx) = mpsc::unbounded_channel();
        let connector = Self {
            dialer: Arc::new(Mutex::new(Dialer::default())),
            released: Arc::new(Notify::new()),
            peers: tx,
        };
        (connector, MemoryServer { peers: rx })
    }

    fn dialer(&self) -> MutexGuard<'_, Dialer> {
        self.dialer.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Refuse the next `n` connect attempts.
    pub fn refuse_next(&self, n: usize) {
        self.dialer().refuse_remaining = n;
    }

    /// Refuse every connect attempt until switched off.
    pub fn refuse_all(&self, refuse: bool) {
        self.dialer().refuse_all = refuse;
    }

    /// Park connect attempts until `release` is called.
    pub fn hold(&self) {
        self.dialer().held = true;
    }

    pub fn release(&self) {
        self.dialer().held = false;
        self.released.notify_waiters();
    }

    /// Time of every connect attempt so far, refused ones included.
    pub fn attempts(&self) -> Vec<Instant> {
        self.dialer().attempts.clone()
    }

    pub fn attempt_count(&self) -> usize {
        self.dialer().attempts.len()
    }
}

#[async_trait]
impl Connector for MemoryConnector {
    async fn connect(&self, endpoint: &str) -> Result<Box<dyn Link>> {
        self.dialer().attempts.push(Instant::now());

        loop {
            let released = self.released.notified();
            if !self.dialer().held {
                break;
            }
            released.await;
        }

        {
            let mut d = self.dialer();
            if d.refuse_all {
                return Err(PactError::Transport(format!("connection refused: {endpoint}")));
            }
            if d.refuse_remaining > 0 {
                d.refuse_remaining -= 1;
                return Err(PactError::Transport(format!("connection refused: {endpoint}")));
            }
        }

        let (frames_tx, frames_rx) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let peer = MemoryPeer {
            frames: frames_rx,
            events: events_tx,
        };
        self.peers
            .send(peer)
            .map_err(|_| PactError::Transport("no memory server listening".into()))?;

        Ok(Box::new(MemoryLink {
            frames: frames_tx,
            events: events_rx,
        }))
    }
}

impl MemoryServer {
    /// Next link opened by the client.
    pub async fn accept(&mut self) -> Option<MemoryPeer> {
        self.peers.recv().await
    }

    pub fn try_accept(&mut self) -> Option<MemoryPeer> {
        self.peers.try_recv().ok()
    }
}

/// Server end of one memory link. Dropping it reads as an abnormal close on the client.
pub struct MemoryPeer {
    frames: mpsc::UnboundedReceiver<PeerFrame>,
    events: mpsc::UnboundedSender<LinkEvent>,
}

impl MemoryPeer {
    pub async fn recv(&mut self) -> Option<PeerFrame> {
        self.frames.recv().await
    }

    pub fn try_recv(&mut self) -> Option<PeerFrame> {
        self.frames.try_recv().ok()
    }

    /// Next text frame parsed as JSON. `None` once the client closed or wrote garbage.
    pub async fn recv_json(&mut self) -> Option<Value> {
        match self.frames.recv().await? {
            PeerFrame::Text(t) => serde_json::from_str(&t).ok(),
            PeerFrame::Close(_) => None,
        }
    }

    pub fn push_text(&self, text: impl Into<String>) {
        let _ = self.events.send(LinkEvent::Text(text.into()));
    }

    pub fn push_json(&self, value: &Value) {
        self.push_text(value.to_string());
    }

    pub fn push_error(&self, msg: impl Into<String>) {
        let _ = self.events.send(LinkEvent::Error(msg.into()));
    }

    pub fn close(&self, code: u16) {
        let _ = self.events.send(LinkEvent::Closed { code });
    }
}

struct MemoryLink {
    frames: mpsc::UnboundedSender<PeerFrame>,
    events: mpsc::UnboundedReceiver<LinkEvent>,
}

#[async_trait]
impl Link for MemoryLink {
    async fn send_text(&mut self, text: String) -> Result<()> {
        self.frames
            .send(PeerFrame::Text(text))
            .map_err(|_| PactError::Transport("memory peer dropped".into()))
    }

    async fn next_event(&mut self) -> LinkEvent {
        self.events
            .recv()
            .await
            .unwrap_or(LinkEvent::Closed { code: CLOSE_ABNORMAL })
    }

    async fn close(&mut self, code: u16) -> Result<()> {
        let _ = self.frames.send(PeerFrame::Close(code));
        Ok(())
    }
}
