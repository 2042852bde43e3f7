//! Connection manager: the task that owns one session's socket.
//!
//! Everything mutable (link, dial future, retry timer, queue, presence) lives
//! in `ConnectionManager` and is driven by a single `select!` loop over:
//! - commands from the session facade
//! - the in-flight dial
//! - events from the open link
//! - the reconnect timer
//!
//! State machine: `Closed -> Connecting` (connect or retry timer),
//! `Connecting -> Open` (link open, queue flushed, auth + join sent),
//! `Connecting | Open -> Closed` (disconnect or closure; a retry may be pending).
//!
//! Writes on a link are bounded by `client.write_timeout_ms`. A failed write on
//! an open link is handled like an abnormal close (1006).

use std::future::pending;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::time::{sleep, Sleep};

use pactline_core::error::{PactError, Result};
use pactline_core::protocol::{Inbound, Outbound, RoomRef};

use crate::auth::AuthProvider;
use crate::config::ClientConfig;
use crate::obs::SessionStats;
use crate::realtime::core::{Backoff, OutboundQueue, PresenceTracker};
use crate::realtime::types::{ConnectionState, PresenceSnapshot, SessionEvent};
use crate::transport::codec::{self, Prepared};
use crate::transport::deadline::WriteDeadline;
use crate::transport::{Connector, Link, LinkEvent, CLOSE_ABNORMAL, CLOSE_NORMAL};

type Dial = BoxFuture<'static, Result<Box<dyn Link>>>;
type Reply<T> = oneshot::Sender<T>;

/// Requests from the session facade.
pub(crate) enum Command {
    Connect { reply: Option<Reply<Result<()>>> },
    Disconnect { reply: Option<Reply<()>> },
    /// Queued; delivered in order once open.
    Send(Outbound),
    /// Written only if open, otherwise dropped.
    SendIfOpen(Outbound),
    Shutdown,
}

/// Publishing ends of the facade's projections.
pub(crate) struct Projections {
    pub state: watch::Sender<ConnectionState>,
    pub presence: watch::Sender<PresenceSnapshot>,
    pub error: watch::Sender<Option<PactError>>,
    pub events: broadcast::Sender<SessionEvent>,
}

pub(crate) struct ConnectionManager {
    endpoint: String,
    user_agent: String,
    write_timeout: Duration,
    room: RoomRef,
    connector: Arc<dyn Connector>,
    auth: Arc<dyn AuthProvider>,

    state: ConnectionState,
    backoff: Backoff,
    link: Option<Box<dyn Link>>,
    dialing: Option<Dial>,
    retry: Option<Pin<Box<Sleep>>>,
    waiter: Option<Reply<Result<()>>>,

    queue: OutboundQueue,
    presence: PresenceTracker,
    out: Projections,
    stats: Arc<SessionStats>,
}

impl ConnectionManager {
    pub(crate) fn new(
        cfg: &ClientConfig,
        room: RoomRef,
        connector: Arc<dyn Connector>,
        auth: Arc<dyn AuthProvider>,
        out: Projections,
        stats: Arc<SessionStats>,
    ) -> Self {
        Self {
            endpoint: cfg.endpoint.clone(),
            user_agent: cfg.client.user_agent.clone(),
            write_timeout: cfg.write_timeout(),
            room,
            connector,
            auth,
            state: ConnectionState::Closed,
            backoff: Backoff::new(cfg.reconnect_policy()),
            link: None,
            dialing: None,
            retry: None,
            waiter: None,
            queue: OutboundQueue::new(),
            presence: PresenceTracker::new(),
            out,
            stats,
        }
    }

    /// Run until `Shutdown` or until every facade handle is gone, then tear down.
    pub(crate) async fn run(mut self, mut cmds: mpsc::UnboundedReceiver<Command>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmds.recv() => match cmd {
                    Some(Command::Connect { reply }) => self.connect(reply),
                    Some(Command::Disconnect { reply }) => {
                        self.disconnect().await;
                        if let Some(reply) = reply {
                            let _ = reply.send(());
                        }
                    }
                    Some(Command::Send(msg)) => self.send(msg).await,
                    Some(Command::SendIfOpen(msg)) => self.send_if_open(msg).await,
                    Some(Command::Shutdown) | None => break,
                },

                dialed = dial_outcome(&mut self.dialing), if self.dialing.is_some() => {
                    self.dialing = None;
                    self.on_dialed(dialed).await;
                }

                ev = link_event(&mut self.link), if self.link.is_some() => self.on_link_event(ev).await,

                () = retry_due(&mut self.retry), if self.retry.is_some() => {
                    self.retry = None;
                    self.on_retry_due();
                }
            }
        }

        self.teardown().await;
    }

    // --------------------
    // Commands
    // --------------------
    fn connect(&mut self, reply: Option<Reply<Result<()>>>) {
        match self.state {
            ConnectionState::Connecting => {
                tracing::debug!("connect rejected: attempt already in flight");
                respond(reply, Err(PactError::ConnectInProgress));
                return;
            }
            ConnectionState::Open => {
                respond(reply, Ok(()));
                return;
            }
            ConnectionState::Closed => {}
        }

        if self.auth.token().is_none() {
            tracing::warn!("connect rejected: no auth token");
            self.report(PactError::AuthMissing);
            respond(reply, Err(PactError::AuthMissing));
            return;
        }

        // explicit connect starts a fresh cycle
        self.retry = None;
        self.backoff.reset();
        self.waiter = reply;
        self.dial();
    }

    async fn disconnect(&mut self) {
        self.retry = None;
        if self.dialing.take().is_some() {
            tracing::debug!("in-flight connect aborted");
        }
        self.fail_waiter(PactError::Aborted);

        if let Some(mut link) = self.link.take() {
            if let Err(e) = link.close(CLOSE_NORMAL).await {
                tracing::debug!(error = %e, "close frame not delivered");
            }
            tracing::info!("disconnected");
        }

        self.clear_presence();
        self.set_state(ConnectionState::Closed);
    }

    async fn send(&mut self, msg: Outbound) {
        let prepared = match Prepared::prepare(&msg) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(error = %e, "dropping unencodable envelope");
                self.report(e);
                return;
            }
        };

        // Always through the queue so a partially flushed backlog keeps its place.
        self.queue.enqueue(prepared);
        if self.state != ConnectionState::Open {
            self.stats.inc_queued();
            tracing::debug!(msg_type = msg.msg_type(), queued = self.queue.len(), "queued until open");
            return;
        }

        let Some(link) = self.link.as_mut() else { return };
        match self.queue.flush(link.as_mut()).await {
            Ok(n) => self.stats.add_sent(n),
            Err(e) => self.drop_open_link(e),
        }
    }

    async fn send_if_open(&mut self, msg: Outbound) {
        if self.state != ConnectionState::Open {
            tracing::debug!(msg_type = msg.msg_type(), "not connected; best-effort envelope skipped");
            return;
        }
        let Some(link) = self.link.as_mut() else { return };
        if let Err(e) = write(link.as_mut(), &self.stats, &msg).await {
            tracing::warn!(msg_type = msg.msg_type(), "best-effort send failed");
            self.drop_open_link(e);
        }
    }

    // --------------------
    // Transport events
    // --------------------
    fn dial(&mut self) {
        let connector = Arc::clone(&self.connector);
        let endpoint = self.endpoint.clone();
        let write_timeout = self.write_timeout;
        tracing::info!(%endpoint, attempt = self.backoff.attempts(), "connecting");
        self.dialing = Some(Box::pin(async move {
            connector
                .connect(&endpoint)
                .await
                .map(|link| WriteDeadline::wrap(link, write_timeout))
        }));
        self.set_state(ConnectionState::Connecting);
    }

    async fn on_dialed(&mut self, dialed: Result<Box<dyn Link>>) {
        match dialed {
            Ok(link) => self.on_open(link).await,
            Err(e) => {
                tracing::warn!(error = %e, "connect attempt failed");
                self.fail_waiter(e.clone());
                self.report(e);
                self.on_closed(CLOSE_ABNORMAL);
            }
        }
    }

    async fn on_open(&mut self, mut link: Box<dyn Link>) {
        // backlog first, then auth, then the room join
        match self.queue.flush(link.as_mut()).await {
            Ok(n) => self.stats.add_sent(n),
            Err(e) => return self.lose_link(link, e),
        }

        let Some(token) = self.auth.token() else {
            tracing::warn!("auth token gone before handshake");
            if let Err(e) = link.close(CLOSE_NORMAL).await {
                tracing::debug!(error = %e, "close frame not delivered");
            }
            self.fail_waiter(PactError::AuthMissing);
            self.set_state(ConnectionState::Closed);
            self.report(PactError::AuthMissing);
            return;
        };

        let greeting = [
            Outbound::Auth {
                token,
                user_agent: self.user_agent.clone(),
            },
            Outbound::join_room(&self.room, self.auth.display_name()),
        ];
        for msg in &greeting {
            if let Err(e) = write(link.as_mut(), &self.stats, msg).await {
                return self.lose_link(link, e);
            }
        }

        self.backoff.reset();
        self.link = Some(link);
        self.out.error.send_replace(None);
        self.set_state(ConnectionState::Open);
        tracing::info!(room = %self.room.id, "session open");

        if let Some(w) = self.waiter.take() {
            let _ = w.send(Ok(()));
        }
    }

    /// Link broke before reaching `Open`.
    fn lose_link(&mut self, link: Box<dyn Link>, e: PactError) {
        tracing::warn!(error = %e, "link failed during handshake");
        drop(link);
        self.fail_waiter(e.clone());
        self.report(e);
        self.on_closed(CLOSE_ABNORMAL);
    }

    /// A write on the open link failed or timed out; the link counts as lost
    /// and whatever was not written stays queued.
    fn drop_open_link(&mut self, e: PactError) {
        tracing::warn!(error = %e, "write failed on open link");
        self.stats.inc_transport_errors();
        self.report(e);
        self.link = None;
        self.on_closed(CLOSE_ABNORMAL);
    }

    async fn on_link_event(&mut self, ev: LinkEvent) {
        match ev {
            LinkEvent::Text(text) => self.on_text(&text),
            LinkEvent::Error(msg) => {
                // surfaced only; closure decides about reconnecting
                tracing::warn!(error = %msg, "transport error");
                self.stats.inc_transport_errors();
                self.report(PactError::Transport(msg));
            }
            LinkEvent::Closed { code } => self.on_peer_closed(code).await,
        }
    }

    async fn on_peer_closed(&mut self, code: u16) {
        // answer the peer's close frame before letting go of the link
        if let Some(mut link) = self.link.take() {
            if let Err(e) = link.close(code).await {
                tracing::debug!(error = %e, "close reply not delivered");
            }
        }
        self.on_closed(code);
    }

    fn on_text(&mut self, text: &str) {
        self.stats.inc_inbound();

        let msg = match codec::decode(text) {
            Ok(m) => m,
            Err(e) => {
                self.stats.inc_malformed();
                tracing::warn!(error = %e, "dropping malformed inbound frame");
                return;
            }
        };

        if let Inbound::Unknown(t) = &msg {
            self.stats.inc_ignored();
            tracing::debug!(msg_type = %t, "ignoring unrecognized envelope");
            return;
        }

        if let Inbound::Error(err) = &msg {
            tracing::warn!(message = %err.message, "server reported error");
            self.report(PactError::Server(err.message.clone()));
        }

        if self.presence.apply(&msg) {
            self.out.presence.send_replace(self.presence.view().clone());
        }

        tracing::trace!(msg_type = msg.msg_type(), "inbound");
        let _ = self.out.events.send(SessionEvent::Inbound(msg));
    }

    fn on_closed(&mut self, code: u16) {
        self.link = None;
        self.clear_presence();

        if code == CLOSE_NORMAL {
            tracing::info!("connection closed normally");
            self.set_state(ConnectionState::Closed);
            return;
        }

        match self.backoff.next_delay() {
            Some(delay) => {
                tracing::info!(
                    code,
                    attempt = self.backoff.attempts(),
                    delay_ms = delay.as_millis() as u64,
                    "scheduling reconnect"
                );
                self.stats.inc_reconnects();
                self.retry = Some(Box::pin(sleep(delay)));
                self.set_state(ConnectionState::Closed);
            }
            None => {
                let attempts = self.backoff.policy().max_attempts();
                tracing::warn!(code, attempts, "reconnect attempts exhausted");
                self.set_state(ConnectionState::Closed);
                self.report(PactError::ReconnectExhausted { attempts });
            }
        }
    }

    fn on_retry_due(&mut self) {
        if self.auth.token().is_none() {
            tracing::warn!("reconnect skipped: no auth token");
            self.report(PactError::AuthMissing);
            return;
        }
        self.dial();
    }

    async fn teardown(&mut self) {
        if self.state == ConnectionState::Open {
            let leave = Outbound::leave_room(&self.room);
            if let Some(link) = self.link.as_mut() {
                if let Err(e) = write(link.as_mut(), &self.stats, &leave).await {
                    tracing::debug!(error = %e, "leave_room not delivered; dropping link");
                    self.link = None;
                }
            }
        }
        self.disconnect().await;
        self.queue.clear();
        tracing::debug!("session torn down");
    }

    // --------------------
    // Projections
    // --------------------
    fn set_state(&mut self, state: ConnectionState) {
        if self.state == state {
            return;
        }
        tracing::debug!(from = %self.state, to = %state, "state changed");
        self.state = state;
        self.out.state.send_replace(state);
        let _ = self.out.events.send(SessionEvent::StateChanged(state));
    }

    fn report(&mut self, e: PactError) {
        self.out.error.send_replace(Some(e.clone()));
        let _ = self.out.events.send(SessionEvent::Error(e));
    }

    fn fail_waiter(&mut self, e: PactError) {
        if let Some(w) = self.waiter.take() {
            let _ = w.send(Err(e));
        }
    }

    fn clear_presence(&mut self) {
        if self.presence.view() != &PresenceSnapshot::default() {
            self.presence.clear();
            self.out.presence.send_replace(PresenceSnapshot::default());
        }
    }
}

fn respond(reply: Option<Reply<Result<()>>>, res: Result<()>) {
    if let Some(reply) = reply {
        let _ = reply.send(res);
    }
}

async fn write(link: &mut dyn Link, stats: &SessionStats, msg: &Outbound) -> Result<()> {
    let prepared = Prepared::prepare(msg)?;
    link.send_text(prepared.text).await?;
    stats.add_sent(1);
    tracing::trace!(msg_type = prepared.msg_type, "sent");
    Ok(())
}

async fn dial_outcome(dialing: &mut Option<Dial>) -> Result<Box<dyn Link>> {
    match dialing {
        Some(fut) => fut.await,
        None => pending().await,
    }
}

async fn link_event(link: &mut Option<Box<dyn Link>>) -> LinkEvent {
    match link {
        Some(l) => l.next_event().await,
        None => pending().await,
    }
}

async fn retry_due(retry: &mut Option<Pin<Box<Sleep>>>) {
    match retry {
        Some(t) => t.as_mut().await,
        None => pending().await,
    }
}
