//! Encode-once / decode-once codec.
//!
//! - Outbound envelopes are serialized when accepted, so queued entries are
//!   plain text frames and flushing never re-encodes.
//! - Inbound text frames are decoded into `Inbound` exactly once.

use pactline_core::{
    error::Result,
    protocol::{Inbound, Outbound},
};

/// Outbound envelope serialized for the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prepared {
    pub msg_type: &'static str,
    pub text: String,
}

impl Prepared {
    pub fn prepare(out: &Outbound) -> Result<Self> {
        Ok(Self {
            msg_type: out.msg_type(),
            text: out.encode()?,
        })
    }
}

pub fn decode(text: &str) -> Result<Inbound> {
    Inbound::decode(text)
}
