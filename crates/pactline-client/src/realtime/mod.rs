//! Realtime runtime for a pactline session.
//!
//! Connection manager + outbound queue + presence tracker, and the projection
//! types they publish to the session facade.

pub mod core;
pub mod types;

pub use self::core::{Backoff, OutboundQueue, PresenceTracker, ReconnectPolicy};
pub use types::{ConnectionState, PresenceSnapshot, SessionEvent};
