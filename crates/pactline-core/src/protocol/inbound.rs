//! Server → client envelopes.
//!
//! Decoding happens in two steps: `Envelope::parse` reads the `type` tag, then
//! only the matching `data` shape is parsed. Presence-changing envelopes
//! (`room_joined`, `user_joined`, `user_left`) must carry the full participant
//! snapshot; a missing snapshot makes the frame malformed.

use serde::Deserialize;
use serde_json::Value;

use crate::error::Result;
use crate::protocol::envelope::Envelope;
use crate::protocol::room::Participant;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Disconnected {
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomJoined {
    #[serde(default)]
    pub room_id: Option<String>,
    pub participants: Vec<Participant>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserJoined {
    pub user_info: Participant,
    pub participants: Vec<Participant>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLeft {
    pub user_id: String,
    pub participants: Vec<Participant>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractUpdated {
    pub timestamp: String,
    pub user_name: String,
    #[serde(default)]
    pub update_type: Option<String>,
    #[serde(default)]
    pub update_data: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingUpdated {
    pub user_id: String,
    pub is_typing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingStopped {
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SyncCompleted {
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerError {
    pub message: String,
}

/// Decoded inbound envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    Connected,
    Disconnected(Disconnected),
    RoomJoined(RoomJoined),
    UserJoined(UserJoined),
    UserLeft(UserLeft),
    ContractUpdated(ContractUpdated),
    TypingUpdated(TypingUpdated),
    TypingStopped(TypingStopped),
    SyncCompleted(SyncCompleted),
    Error(ServerError),
    /// Unrecognized `type`; receivers ignore it.
    Unknown(String),
}

impl Inbound {
    /// Decode a text frame.
    pub fn decode(text: &str) -> Result<Self> {
        Self::from_envelope(&Envelope::parse(text)?)
    }

    pub fn from_envelope(env: &Envelope) -> Result<Self> {
        let msg = match env.msg_type.as_str() {
            "connected" => Inbound::Connected,
            "disconnected" => Inbound::Disconnected(env.data_as()?),
            "room_joined" => Inbound::RoomJoined(env.data_as()?),
            "user_joined" => Inbound::UserJoined(env.data_as()?),
            "user_left" => Inbound::UserLeft(env.data_as()?),
            "contract_updated" => Inbound::ContractUpdated(env.data_as()?),
            "typing_updated" => Inbound::TypingUpdated(env.data_as()?),
            "typing_stopped" => Inbound::TypingStopped(env.data_as()?),
            "sync_completed" => Inbound::SyncCompleted(env.data_as()?),
            "error" => Inbound::Error(env.data_as()?),
            other => Inbound::Unknown(other.to_owned()),
        };
        Ok(msg)
    }

    /// Wire `type` tag.
    pub fn msg_type(&self) -> &str {
        match self {
            Inbound::Connected => "connected",
            Inbound::Disconnected(_) => "disconnected",
            Inbound::RoomJoined(_) => "room_joined",
            Inbound::UserJoined(_) => "user_joined",
            Inbound::UserLeft(_) => "user_left",
            Inbound::ContractUpdated(_) => "contract_updated",
            Inbound::TypingUpdated(_) => "typing_updated",
            Inbound::TypingStopped(_) => "typing_stopped",
            Inbound::SyncCompleted(_) => "sync_completed",
            Inbound::Error(_) => "error",
            Inbound::Unknown(t) => t,
        }
    }

    /// Full participant snapshot, for envelopes that carry one.
    pub fn participants(&self) -> Option<&[Participant]> {
        match self {
            Inbound::RoomJoined(m) => Some(&m.participants),
            Inbound::UserJoined(m) => Some(&m.participants),
            Inbound::UserLeft(m) => Some(&m.participants),
            _ => None,
        }
    }
}
