//! Realtime core components.
//!
//! Backoff policy, outbound queue, presence tracking, and the connection
//! manager task that owns them.

mod backoff;
pub(crate) mod connection;
mod presence;
mod queue;

pub use backoff::{Backoff, ReconnectPolicy};
pub use presence::PresenceTracker;
pub use queue::OutboundQueue;
