use std::collections::VecDeque;

use pactline_core::error::Result;

use crate::transport::codec::Prepared;
use crate::transport::Link;

/// FIFO of envelopes waiting for an open link.
///
/// Entries leave strictly in enqueue order and only after the link accepted
/// them; nothing is reordered, merged or dropped.
#[derive(Debug, Default)]
pub struct OutboundQueue {
    items: VecDeque<Prepared>,
}

impl OutboundQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, msg: Prepared) {
        self.items.push_back(msg);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Message types in queue order.
    pub fn pending_types(&self) -> Vec<&'static str> {
        self.items.iter().map(|p| p.msg_type).collect()
    }

    /// Write entries from the head until empty or the link refuses one.
    ///
    /// A refused entry stays at the head with everything behind it. Returns the
    /// number written, or the link error after a partial flush.
    pub async fn flush(&mut self, link: &mut dyn Link) -> Result<usize> {
        let mut sent = 0;
        while let Some(head) = self.items.front() {
            if let Err(e) = link.send_text(head.text.clone()).await {
                tracing::warn!(sent, remaining = self.items.len(), error = %e, "queue flush stopped");
                return Err(e);
            }
            self.items.pop_front();
            sent += 1;
        }
        if sent > 0 {
            tracing::debug!(sent, "queue flushed");
        }
        Ok(sent)
    }
}
