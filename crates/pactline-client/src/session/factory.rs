use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, watch};
use tracing::Instrument;

use pactline_core::protocol::RoomRef;

use crate::auth::AuthProvider;
use crate::config::ClientConfig;
use crate::obs::SessionStats;
use crate::realtime::core::connection::{Command, ConnectionManager, Projections};
use crate::realtime::types::{ConnectionState, PresenceSnapshot};
use crate::session::Session;
use crate::transport::ws::WsConnector;
use crate::transport::Connector;

/// Builds per-view sessions sharing config, transport and credentials.
#[derive(Clone)]
pub struct SessionFactory {
    cfg: Arc<ClientConfig>,
    connector: Arc<dyn Connector>,
    auth: Arc<dyn AuthProvider>,
}

impl SessionFactory {
    pub fn new(cfg: ClientConfig, connector: Arc<dyn Connector>, auth: Arc<dyn AuthProvider>) -> Self {
        Self {
            cfg: Arc::new(cfg),
            connector,
            auth,
        }
    }

    /// Factory dialing real WebSocket endpoints.
    pub fn with_ws(cfg: ClientConfig, auth: Arc<dyn AuthProvider>) -> Self {
        let connector = Arc::new(WsConnector::new(cfg.connect_timeout()));
        Self::new(cfg, connector, auth)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.cfg
    }

    /// Create a session for `room` and start connecting.
    ///
    /// Connect failures land in the session's error projection; the returned
    /// handle keeps retrying per the reconnect policy. Must be called inside a
    /// tokio runtime.
    pub fn mount(&self, room: RoomRef) -> Session {
        let session = self.open(room);
        session.start_connect();
        session
    }

    /// Create a session for `room` without connecting.
    pub fn open(&self, room: RoomRef) -> Session {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<Command>();
        let (state_tx, state_rx) = watch::channel(ConnectionState::Closed);
        let (presence_tx, presence_rx) = watch::channel(PresenceSnapshot::default());
        let (error_tx, error_rx) = watch::channel(None);
        let (events_tx, _) = broadcast::channel(self.cfg.client.event_buffer.max(1));
        let stats = Arc::new(SessionStats::default());

        let out = Projections {
            state: state_tx,
            presence: presence_tx,
            error: error_tx,
            events: events_tx.clone(),
        };
        let manager = ConnectionManager::new(
            &self.cfg,
            room.clone(),
            Arc::clone(&self.connector),
            Arc::clone(&self.auth),
            out,
            Arc::clone(&stats),
        );

        let span = tracing::info_span!("session", room = %room.id, kind = %room.kind);
        let task = tokio::spawn(manager.run(cmd_rx).instrument(span));

        Session::new(room, cmd_tx, state_rx, presence_rx, error_rx, events_tx, stats, task)
    }
}
