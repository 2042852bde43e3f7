//! Top-level facade crate for pactline.
//!
//! Re-exports the protocol types and the session client so applications can depend on a single crate.

pub mod core {
    pub use pactline_core::*;
}

pub mod client {
    pub use pactline_client::*;
}
