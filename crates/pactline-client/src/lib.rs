//! pactline session client.
//!
//! Wires the transport, connection manager, outbound queue, presence tracker,
//! and the per-view session facade into one library. Consumed by the `pactline`
//! binary and by applications embedding contract-room collaboration.
//!
//! All library paths return `PactError` instead of panicking.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod auth;
pub mod config;
pub mod obs;
pub mod realtime;
pub mod session;
pub mod transport;

pub use auth::{AuthProvider, StaticAuth};
pub use config::ClientConfig;
pub use realtime::{ConnectionState, PresenceSnapshot, SessionEvent};
pub use session::{Session, SessionFactory};
