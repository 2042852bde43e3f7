use std::time::Duration;

use serde::Deserialize;
use pactline_core::error::{PactError, Result};

use crate::realtime::core::ReconnectPolicy;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    pub version: u32,

    /// WebSocket endpoint (`ws://` or `wss://`).
    pub endpoint: String,

    #[serde(default)]
    pub reconnect: ReconnectSection,

    #[serde(default)]
    pub client: ClientSection,
}

impl ClientConfig {
    /// Defaults for everything but the endpoint.
    pub fn for_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            version: 1,
            endpoint: endpoint.into(),
            reconnect: ReconnectSection::default(),
            client: ClientSection::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(PactError::UnsupportedVersion);
        }
        if !(self.endpoint.starts_with("ws://") || self.endpoint.starts_with("wss://")) {
            return Err(PactError::InvalidConfig(
                "endpoint must start with ws:// or wss://".into(),
            ));
        }

        self.reconnect.validate()?;
        self.client.validate()?;

        Ok(())
    }

    pub fn reconnect_policy(&self) -> ReconnectPolicy {
        ReconnectPolicy::new(
            Duration::from_millis(self.reconnect.base_delay_ms),
            self.reconnect.max_attempts,
        )
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.client.connect_timeout_ms)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.client.write_timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReconnectSection {
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for ReconnectSection {
    fn default() -> Self {
        Self {
            base_delay_ms: default_base_delay_ms(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl ReconnectSection {
    pub fn validate(&self) -> Result<()> {
        if !(10..=60000).contains(&self.base_delay_ms) {
            return Err(PactError::InvalidConfig(
                "reconnect.base_delay_ms must be between 10 and 60000".into(),
            ));
        }
        if self.max_attempts > 16 {
            return Err(PactError::InvalidConfig(
                "reconnect.max_attempts must be at most 16".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientSection {
    /// Sent in the `auth` envelope as `userAgent`.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Upper bound for a single frame write or close on an open link.
    #[serde(default = "default_write_timeout_ms")]
    pub write_timeout_ms: u64,

    /// Capacity of the per-session event broadcast.
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

impl Default for ClientSection {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            connect_timeout_ms: default_connect_timeout_ms(),
            write_timeout_ms: default_write_timeout_ms(),
            event_buffer: default_event_buffer(),
        }
    }
}

impl ClientSection {
    pub fn validate(&self) -> Result<()> {
        if self.user_agent.trim().is_empty() {
            return Err(PactError::InvalidConfig("client.user_agent must not be empty".into()));
        }
        if !(100..=120000).contains(&self.connect_timeout_ms) {
            return Err(PactError::InvalidConfig(
                "client.connect_timeout_ms must be between 100 and 120000".into(),
            ));
        }
        if !(100..=120000).contains(&self.write_timeout_ms) {
            return Err(PactError::InvalidConfig(
                "client.write_timeout_ms must be between 100 and 120000".into(),
            ));
        }
        if self.event_buffer == 0 {
            return Err(PactError::InvalidConfig("client.event_buffer must be at least 1".into()));
        }
        Ok(())
    }
}

fn default_base_delay_ms() -> u64 {
    1000
}
fn default_max_attempts() -> u32 {
    5
}
fn default_user_agent() -> String {
    concat!("pactline/", env!("CARGO_PKG_VERSION")).into()
}
fn default_connect_timeout_ms() -> u64 {
    10000
}
fn default_write_timeout_ms() -> u64 {
    5000
}
fn default_event_buffer() -> usize {
    256
}
