//! Client → server envelopes.

use serde::Serialize;
use serde_json::Value;

use crate::error::{PactError, Result};
use crate::protocol::room::RoomRef;

/// Outbound envelope, serialized as `{"type": <snake_case>, "data": {<camelCase>}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(
    tag = "type",
    content = "data",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum Outbound {
    Auth {
        token: String,
        user_agent: String,
    },
    JoinRoom {
        room_id: String,
        room_type: String,
        user_name: String,
    },
    LeaveRoom {
        room_id: String,
        room_type: String,
    },
    ChatMessage {
        room_id: String,
        room_type: String,
        message: String,
        message_type: String,
    },
    ContractUpdate {
        contract_id: String,
        update_type: String,
        update_data: Value,
    },
    DocumentUpload {
        room_id: String,
        room_type: String,
        document_data: Value,
    },
    Typing {
        room_id: String,
        room_type: String,
        is_typing: bool,
    },
    SyncRequest {
        contract_id: String,
    },
}

impl Outbound {
    pub fn join_room(room: &RoomRef, user_name: impl Into<String>) -> Self {
        Outbound::JoinRoom {
            room_id: room.id.clone(),
            room_type: room.kind.clone(),
            user_name: user_name.into(),
        }
    }

    pub fn leave_room(room: &RoomRef) -> Self {
        Outbound::LeaveRoom {
            room_id: room.id.clone(),
            room_type: room.kind.clone(),
        }
    }

    pub fn chat_message(
        room: &RoomRef,
        message: impl Into<String>,
        message_type: impl Into<String>,
    ) -> Self {
        Outbound::ChatMessage {
            room_id: room.id.clone(),
            room_type: room.kind.clone(),
            message: message.into(),
            message_type: message_type.into(),
        }
    }

    pub fn typing(room: &RoomRef, is_typing: bool) -> Self {
        Outbound::Typing {
            room_id: room.id.clone(),
            room_type: room.kind.clone(),
            is_typing,
        }
    }

    pub fn document_upload(room: &RoomRef, document_data: Value) -> Self {
        Outbound::DocumentUpload {
            room_id: room.id.clone(),
            room_type: room.kind.clone(),
            document_data,
        }
    }

    /// Wire `type` tag.
    pub fn msg_type(&self) -> &'static str {
        match self {
            Outbound::Auth { .. } => "auth",
            Outbound::JoinRoom { .. } => "join_room",
            Outbound::LeaveRoom { .. } => "leave_room",
            Outbound::ChatMessage { .. } => "chat_message",
            Outbound::ContractUpdate { .. } => "contract_update",
            Outbound::DocumentUpload { .. } => "document_upload",
            Outbound::Typing { .. } => "typing",
            Outbound::SyncRequest { .. } => "sync_request",
        }
    }

    /// Serialize to a JSON text frame.
    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| PactError::Internal(format!("{} encode failed: {e}", self.msg_type())))
    }
}
