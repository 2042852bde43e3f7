//! tokio-tungstenite backed transport.

use std::borrow::Cow;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use pactline_core::error::{PactError, Result};

use super::{Connector, Link, LinkEvent, CLOSE_ABNORMAL, CLOSE_NO_STATUS};

/// Dials WebSocket endpoints with a connect timeout.
#[derive(Debug, Clone)]
pub struct WsConnector {
    connect_timeout: Duration,
}

impl WsConnector {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }
}

#[async_trait]
impl Connector for WsConnector {
    async fn connect(&self, endpoint: &str) -> Result<Box<dyn Link>> {
        let (stream, _resp) = timeout(self.connect_timeout, connect_async(endpoint))
            .await
            .map_err(|_| PactError::Transport("connect timed out".into()))?
            .map_err(|e| PactError::Transport(format!("connect failed: {e}")))?;
        tracing::debug!(%endpoint, "websocket handshake complete");
        Ok(Box::new(WsLink { stream }))
    }
}

pub struct WsLink {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl Link for WsLink {
    async fn send_text(&mut self, text: String) -> Result<()> {
        self.stream
            .send(Message::Text(text))
            .await
            .map_err(|e| PactError::Transport(format!("send failed: {e}")))
    }

    async fn next_event(&mut self) -> LinkEvent {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(s))) => return LinkEvent::Text(s),
                Some(Ok(Message::Binary(b))) => match String::from_utf8(b) {
                    Ok(s) => return LinkEvent::Text(s),
                    Err(_) => {
                        tracing::warn!("ignoring non-utf8 binary frame");
                        continue;
                    }
                },
                Some(Ok(Message::Close(frame))) => {
                    let code = frame.map(|f| u16::from(f.code)).unwrap_or(CLOSE_NO_STATUS);
                    return LinkEvent::Closed { code };
                }
                // ping/pong are answered by tungstenite itself
                Some(Ok(_)) => continue,
                Some(Err(e)) => return LinkEvent::Error(e.to_string()),
                None => return LinkEvent::Closed { code: CLOSE_ABNORMAL },
            }
        }
    }

    async fn close(&mut self, code: u16) -> Result<()> {
        let frame = CloseFrame {
            code: CloseCode::from(code),
            reason: Cow::Borrowed(""),
        };
        self.stream
            .send(Message::Close(Some(frame)))
            .await
            .map_err(|e| PactError::Transport(format!("close failed: {e}")))
    }
}
