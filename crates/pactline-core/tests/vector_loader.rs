//! JSON test vector loader shared by inbound tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TestVector {
    pub description: String,
    pub frame: FrameData,
    #[serde(default)]
    pub expect: Option<serde_json::Value>,
    #[serde(default)]
    pub expect_error: Option<ExpectError>,
}

#[derive(Debug, Deserialize)]
pub struct ExpectError {
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct FrameData {
    pub encoding: String,
    pub data: serde_json::Value,
}

impl FrameData {
    /// Text frame as the socket would deliver it.
    pub fn text(&self) -> String {
        match self.encoding.as_str() {
            "json" => self.data.to_string(),
            "text" => self.data.as_str().expect("text vector must be a string").to_owned(),
            other => panic!("unsupported encoding: {other}"),
        }
    }
}
