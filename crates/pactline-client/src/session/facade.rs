use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use pactline_core::error::{PactError, Result};
use pactline_core::protocol::{Outbound, Participant, RoomRef};

use crate::obs::{SessionStats, StatsSnapshot};
use crate::realtime::core::connection::Command;
use crate::realtime::types::{ConnectionState, PresenceSnapshot, SessionEvent};

/// A view's handle on its room session.
///
/// Reads are projections published by the session task. Writes are intents:
/// `send`, `send_chat_message` and `upload_document` queue until the socket
/// is open; `send_typing_status`, `request_sync` and `send_contract_update`
/// are skipped unless the session is open at the time they are processed.
///
/// Dropping the handle tears the session down (leave, close 1000, clear).
pub struct Session {
    room: RoomRef,
    cmds: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<ConnectionState>,
    presence: watch::Receiver<PresenceSnapshot>,
    error: watch::Receiver<Option<PactError>>,
    events: broadcast::Sender<SessionEvent>,
    stats: Arc<SessionStats>,
    task: Option<JoinHandle<()>>,
}

impl Session {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        room: RoomRef,
        cmds: mpsc::UnboundedSender<Command>,
        state: watch::Receiver<ConnectionState>,
        presence: watch::Receiver<PresenceSnapshot>,
        error: watch::Receiver<Option<PactError>>,
        events: broadcast::Sender<SessionEvent>,
        stats: Arc<SessionStats>,
        task: JoinHandle<()>,
    ) -> Self {
        Self {
            room,
            cmds,
            state,
            presence,
            error,
            events,
            stats,
            task: Some(task),
        }
    }

    pub fn room(&self) -> &RoomRef {
        &self.room
    }

    // --------------------
    // Projections
    // --------------------
    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Open
    }

    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.clone()
    }

    pub fn presence(&self) -> PresenceSnapshot {
        self.presence.borrow().clone()
    }

    pub fn watch_presence(&self) -> watch::Receiver<PresenceSnapshot> {
        self.presence.clone()
    }

    pub fn participants(&self) -> Vec<Participant> {
        self.presence.borrow().participants.clone()
    }

    pub fn online_count(&self) -> usize {
        self.presence.borrow().online_count()
    }

    pub fn typing_participants(&self) -> Vec<Participant> {
        self.presence.borrow().typing_participants()
    }

    pub fn is_user_typing(&self, user_id: &str) -> bool {
        self.presence.borrow().is_user_typing(user_id)
    }

    pub fn last_error(&self) -> Option<PactError> {
        self.error.borrow().clone()
    }

    pub fn watch_error(&self) -> watch::Receiver<Option<PactError>> {
        self.error.clone()
    }

    /// Inbound envelopes, state changes and errors from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    // --------------------
    // Lifecycle
    // --------------------
    /// Connect and authenticate. Resolves once the socket is open and the
    /// auth envelope has been written.
    pub async fn connect(&self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.command(Command::Connect { reply: Some(tx) })?;
        rx.await.map_err(|_| PactError::SessionClosed)?
    }

    pub(crate) fn start_connect(&self) {
        let _ = self.command(Command::Connect { reply: None });
    }

    /// Close with a normal-closure code and cancel any pending reconnect.
    pub async fn disconnect(&self) {
        let (tx, rx) = oneshot::channel();
        if self.command(Command::Disconnect { reply: Some(tx) }).is_ok() {
            let _ = rx.await;
        }
    }

    /// Tear down and wait for the session task to finish.
    pub async fn unmount(mut self) {
        let _ = self.cmds.send(Command::Shutdown);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "session task ended abnormally");
            }
        }
    }

    // --------------------
    // Intents
    // --------------------
    /// Queue an envelope; delivered in order once the socket is open.
    pub fn send(&self, msg: Outbound) -> Result<()> {
        self.command(Command::Send(msg))
    }

    pub fn send_chat_message(&self, message: impl Into<String>, message_type: impl Into<String>) -> Result<()> {
        self.send(Outbound::chat_message(&self.room, message, message_type))
    }

    pub fn upload_document(&self, document_data: Value) -> Result<()> {
        self.send(Outbound::document_upload(&self.room, document_data))
    }

    pub fn send_typing_status(&self, is_typing: bool) {
        self.best_effort(Outbound::typing(&self.room, is_typing));
    }

    pub fn request_sync(&self) {
        self.best_effort(Outbound::SyncRequest {
            contract_id: self.room.id.clone(),
        });
    }

    pub fn send_contract_update(&self, update_type: impl Into<String>, update_data: Value) {
        self.best_effort(Outbound::ContractUpdate {
            contract_id: self.room.id.clone(),
            update_type: update_type.into(),
            update_data,
        });
    }

    fn best_effort(&self, msg: Outbound) {
        if !self.is_connected() {
            return;
        }
        let _ = self.command(Command::SendIfOpen(msg));
    }

    fn command(&self, cmd: Command) -> Result<()> {
        self.cmds.send(cmd).map_err(|_| PactError::SessionClosed)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        // the task finishes teardown on its own; the handle is detached
        let _ = self.cmds.send(Command::Shutdown);
    }
}
