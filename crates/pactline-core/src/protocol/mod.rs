//! Wire protocol: JSON `{type, data}` envelopes over a persistent socket.
//!
//! - `envelope`: the raw frame, with `data` kept as `RawValue` until the type is known.
//! - `inbound`: server → client vocabulary, decoded lazily from an `Envelope`.
//! - `outbound`: client → server vocabulary, serialized once.
//! - `room`: room references and participant records shared by both directions.
//!
//! Decoders are panic-free: an unknown `type` decodes to `Inbound::Unknown`, a
//! known `type` with the wrong `data` shape is `PactError::Malformed`.

pub mod envelope;
pub mod inbound;
pub mod outbound;
pub mod room;

pub use envelope::Envelope;
pub use inbound::Inbound;
pub use outbound::Outbound;
pub use room::{Participant, RoomRef};
