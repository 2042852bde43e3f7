use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

#[derive(Debug, Default)]
pub struct SessionStats {
    sent: AtomicU64,
    queued: AtomicU64,
    inbound: AtomicU64,
    malformed: AtomicU64,
    ignored: AtomicU64,
    transport_errors: AtomicU64,
    reconnects: AtomicU64,
}

impl SessionStats {
    pub fn add_sent(&self, n: usize) {
        self.sent.fetch_add(n as u64, Ordering::Relaxed);
    }
    pub fn inc_queued(&self) {
        self.queued.fetch_add(1, Ordering::Relaxed);
    }
    pub fn inc_inbound(&self) {
        self.inbound.fetch_add(1, Ordering::Relaxed);
    }
    pub fn inc_malformed(&self) {
        self.malformed.fetch_add(1, Ordering::Relaxed);
    }
    pub fn inc_ignored(&self) {
        self.ignored.fetch_add(1, Ordering::Relaxed);
    }
    pub fn inc_transport_errors(&self) {
        self.transport_errors.fetch_add(1, Ordering::Relaxed);
    }
    pub fn inc_reconnects(&self) {
        self.reconnects.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            sent: self.sent.load(Ordering::Relaxed),
            queued: self.queued.load(Ordering::Relaxed),
            inbound: self.inbound.load(Ordering::Relaxed),
            malformed: self.malformed.load(Ordering::Relaxed),
            ignored: self.ignored.load(Ordering::Relaxed),
            transport_errors: self.transport_errors.load(Ordering::Relaxed),
            reconnects: self.reconnects.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of a session's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Frames written to the socket, including auth/join and flushed backlog.
    pub sent: u64,
    /// Envelopes that had to wait for an open link.
    pub queued: u64,
    pub inbound: u64,
    /// Inbound frames dropped because they failed to decode.
    pub malformed: u64,
    /// Inbound frames with an unrecognized `type`.
    pub ignored: u64,
    pub transport_errors: u64,
    /// Reconnects scheduled after abnormal closure.
    pub reconnects: u64,
}

impl StatsSnapshot {
    /// Render in Prometheus text exposition format, labelled by room.
    pub fn render(&self, room: &str) -> String {
        let room = escape_label(room);
        let mut out = String::new();
        let counters = [
            ("pactline_frames_sent_total", self.sent),
            ("pactline_envelopes_queued_total", self.queued),
            ("pactline_frames_inbound_total", self.inbound),
            ("pactline_frames_malformed_total", self.malformed),
            ("pactline_frames_ignored_total", self.ignored),
            ("pactline_transport_errors_total", self.transport_errors),
            ("pactline_reconnects_total", self.reconnects),
        ];
        for (name, val) in counters {
            let _ = writeln!(out, "# TYPE {} counter", name);
            let _ = writeln!(out, "{}{{room=\"{}\"}} {}", name, room, val);
        }
        out
    }
}
