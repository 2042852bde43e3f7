//! Raw `{type, data}` envelope (JSON text frame).
//!
//! `data` is stored as `RawValue` so the body is only parsed once the
//! receiver knows which shape to expect.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::value::RawValue;

use crate::error::{PactError, Result};

/// Envelope as received on the wire.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    /// Message type (field name is `type` in JSON).
    #[serde(rename = "type")]
    pub msg_type: String,
    /// Optional payload, stored as raw JSON (lazy parsing).
    #[serde(default)]
    pub data: Option<Box<RawValue>>,
}

impl Envelope {
    /// Parse the header of a text frame.
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| PactError::Malformed(format!("invalid envelope json: {e}")))
    }

    /// Decode `data` into `T`. Absent or `null` data decodes as an empty object.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T> {
        let raw = match self.data.as_deref().map(RawValue::get) {
            Some(r) if r.trim() != "null" => r,
            _ => "{}",
        };
        serde_json::from_str(raw)
            .map_err(|e| PactError::Malformed(format!("{} data: {e}", self.msg_type)))
    }
}
