use pactline_core::protocol::{Inbound, Participant};

use crate::realtime::types::PresenceSnapshot;

/// Room presence derived from inbound envelopes.
///
/// Membership is replaced wholesale from each server snapshot; typing flags are
/// keyed by user id and removed when cleared.
#[derive(Debug, Default)]
pub struct PresenceTracker {
    view: PresenceSnapshot,
}

impl PresenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one envelope. Returns true when the projection changed.
    pub fn apply(&mut self, msg: &Inbound) -> bool {
        match msg {
            Inbound::RoomJoined(m) => self.resync(&m.participants),
            Inbound::UserJoined(m) => self.resync(&m.participants),
            Inbound::UserLeft(m) => self.resync(&m.participants),
            Inbound::TypingUpdated(t) => self.set_typing(&t.user_id, t.is_typing),
            Inbound::TypingStopped(t) => self.set_typing(&t.user_id, false),
            _ => false,
        }
    }

    fn resync(&mut self, snapshot: &[Participant]) -> bool {
        let previous = std::mem::replace(&mut self.view.participants, snapshot.to_vec());
        let PresenceSnapshot { participants, typing } = &mut self.view;
        let typing_before = typing.len();
        typing.retain(|id, _| participants.iter().any(|p| &p.user_id == id));
        self.refresh();
        self.view.participants != previous || self.view.typing.len() != typing_before
    }

    /// Set or clear one user's typing flag. Returns true when it changed.
    pub fn set_typing(&mut self, user_id: &str, is_typing: bool) -> bool {
        // the map only ever holds `true`
        let changed = if is_typing {
            self.view.typing.insert(user_id.to_owned(), true).is_none()
        } else {
            self.view.typing.remove(user_id).is_some()
        };
        if changed {
            self.refresh();
        }
        changed
    }

    // Participant flags always mirror the typing map.
    fn refresh(&mut self) {
        let typing = &self.view.typing;
        for p in &mut self.view.participants {
            p.is_typing = typing.get(&p.user_id).copied().unwrap_or(false);
        }
    }

    pub fn view(&self) -> &PresenceSnapshot {
        &self.view
    }

    pub fn online_count(&self) -> usize {
        self.view.online_count()
    }

    pub fn typing_participants(&self) -> Vec<Participant> {
        self.view.typing_participants()
    }

    pub fn is_user_typing(&self, user_id: &str) -> bool {
        self.view.is_user_typing(user_id)
    }

    pub fn clear(&mut self) {
        self.view = PresenceSnapshot::default();
    }
}
