use serde::{Deserialize, Serialize};

/// Room kind used for contract collaboration rooms.
pub const CONTRACT_ROOM: &str = "contract";

/// A room on the server, addressed by id and kind (`roomId` / `roomType` on the wire).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomRef {
    pub id: String,
    pub kind: String,
}

impl RoomRef {
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
        }
    }

    /// Collaboration room of a single contract.
    pub fn contract(contract_id: impl Into<String>) -> Self {
        Self::new(contract_id, CONTRACT_ROOM)
    }
}

/// Participant record from a server presence snapshot.
///
/// `user_id` and `name` are identity and never change after creation. The
/// session client rewrites `is_typing` from its typing map before handing
/// projections out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub user_id: String,
    pub name: String,
    #[serde(default = "default_online")]
    pub is_online: bool,
    #[serde(default)]
    pub is_typing: bool,
}

impl Participant {
    pub fn new(user_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            is_online: true,
            is_typing: false,
        }
    }
}

fn default_online() -> bool {
    true
}
