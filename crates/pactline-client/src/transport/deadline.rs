//! Write deadline for any `Link`.

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::timeout;

use pactline_core::error::{PactError, Result};

use super::{Link, LinkEvent};

/// Bounds `send_text` and `close` on the wrapped link. Reads are not bounded.
pub struct WriteDeadline {
    inner: Box<dyn Link>,
    limit: Duration,
}

impl WriteDeadline {
    pub fn wrap(inner: Box<dyn Link>, limit: Duration) -> Box<dyn Link> {
        Box::new(Self { inner, limit })
    }
}

#[async_trait]
impl Link for WriteDeadline {
    async fn send_text(&mut self, text: String) -> Result<()> {
        let limit = self.limit;
        timeout(limit, self.inner.send_text(text))
            .await
            .map_err(|_| PactError::Transport(format!("write timed out after {}ms", limit.as_millis())))?
    }

    async fn next_event(&mut self) -> LinkEvent {
        self.inner.next_event().await
    }

    async fn close(&mut self, code: u16) -> Result<()> {
        let limit = self.limit;
        timeout(limit, self.inner.close(code))
            .await
            .map_err(|_| PactError::Transport(format!("close timed out after {}ms", limit.as_millis())))?
    }
}
