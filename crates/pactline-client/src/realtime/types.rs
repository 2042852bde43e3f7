use std::collections::BTreeMap;
use std::fmt;

use pactline_core::error::PactError;
use pactline_core::protocol::{Inbound, Participant};

/// Connection lifecycle as seen by views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    Connecting,
    Open,
    #[default]
    Closed,
}

impl ConnectionState {
    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionState::Connecting => "connecting",
            ConnectionState::Open => "open",
            ConnectionState::Closed => "closed",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event fan-out to session subscribers (stands in for UI callbacks).
#[derive(Debug, Clone)]
pub enum SessionEvent {
    StateChanged(ConnectionState),
    Inbound(Inbound),
    Error(PactError),
}

/// Read-only presence projection of the session's room.
///
/// `typing` only holds users currently typing; a missing key means not typing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresenceSnapshot {
    pub participants: Vec<Participant>,
    pub typing: BTreeMap<String, bool>,
}

impl PresenceSnapshot {
    pub fn online_count(&self) -> usize {
        self.participants.iter().filter(|p| p.is_online).count()
    }

    pub fn typing_participants(&self) -> Vec<Participant> {
        self.participants
            .iter()
            .filter(|p| self.is_user_typing(&p.user_id))
            .cloned()
            .collect()
    }

    pub fn is_user_typing(&self, user_id: &str) -> bool {
        self.typing.get(user_id).copied().unwrap_or(false)
    }

    pub fn contains(&self, user_id: &str) -> bool {
        self.participants.iter().any(|p| p.user_id == user_id)
    }
}
