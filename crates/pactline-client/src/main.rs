//! pactline CLI
//!
//! Joins one contract room and bridges it to the terminal:
//! - `pactline <config.yaml> <contract-id>`
//! - credentials from `PACTLINE_TOKEN` / `PACTLINE_USER`
//! - stdin lines are sent as chat messages; `/sync` requests a sync,
//!   `/typing` and `/idle` toggle the typing flag
//! - inbound traffic, state changes and errors are logged via `RUST_LOG`

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{fmt, EnvFilter};

use pactline_client::{config, SessionEvent, SessionFactory, StaticAuth};
use pactline_core::error::{PactError, Result};
use pactline_core::protocol::RoomRef;

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    if let Err(e) = run().await {
        tracing::error!(code = e.code().as_str(), error = %e, "pactline exited");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let (Some(cfg_path), Some(contract_id)) = (args.next(), args.next()) else {
        return Err(PactError::InvalidConfig(
            "usage: pactline <config.yaml> <contract-id>".into(),
        ));
    };

    let cfg = config::load_from_file(&cfg_path)?;
    let auth = StaticAuth::new(
        std::env::var("PACTLINE_TOKEN").ok(),
        std::env::var("PACTLINE_USER").unwrap_or_else(|_| "pactline-cli".into()),
    );

    tracing::info!(endpoint = %cfg.endpoint, %contract_id, "pactline starting");
    let factory = SessionFactory::with_ws(cfg, Arc::new(auth));
    let session = factory.mount(RoomRef::contract(contract_id));
    let mut events = session.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            ev = events.recv() => match ev {
                Ok(SessionEvent::Inbound(msg)) => tracing::info!(msg_type = msg.msg_type(), ?msg, "inbound"),
                Ok(SessionEvent::StateChanged(state)) => tracing::info!(%state, "connection"),
                Ok(SessionEvent::Error(e)) => tracing::warn!(code = e.code().as_str(), error = %e, "session error"),
                Err(RecvError::Lagged(n)) => tracing::warn!(skipped = n, "event stream lagged"),
                Err(RecvError::Closed) => break,
            },

            line = lines.next_line() => match line {
                Ok(Some(line)) => match line.trim() {
                    "" => {}
                    "/sync" => session.request_sync(),
                    "/typing" => session.send_typing_status(true),
                    "/idle" => session.send_typing_status(false),
                    text => session.send_chat_message(text, "text")?,
                },
                Ok(None) => break,
                Err(e) => return Err(PactError::Internal(format!("stdin read failed: {e}"))),
            },

            _ = tokio::signal::ctrl_c() => break,
        }
    }

    let stats = session.stats();
    let room = session.room().id.clone();
    session.unmount().await;
    tracing::info!(?stats, "session closed");
    print!("{}", stats.render(&room));
    Ok(())
}
