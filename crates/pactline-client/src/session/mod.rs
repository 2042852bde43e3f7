//! Session facade consumed by views.
//!
//! A `SessionFactory` holds the shared config, connector and credentials; each
//! view mounts its own `Session` for one room. There is no process-wide socket.

mod facade;
mod factory;

pub use facade::Session;
pub use factory::SessionFactory;
