//! pactline core: transport-agnostic envelope types, room/participant records, and errors.
//!
//! Wire-level types shared by the session client and the CLI. No transport or
//! runtime dependencies.
//!
//! # Panic policy
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! A malformed frame from the server surfaces as `PactError::Malformed`, never a crash.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;

/// Shared result type.
pub use error::{ErrorCode, PactError, Result};
