//! Lightweight per-session counters.
//!
//! Counters are plain atomics shared between the session task and its facade;
//! `StatsSnapshot::render` emits Prometheus text for embedding applications.

pub mod stats;

pub use stats::{SessionStats, StatsSnapshot};
