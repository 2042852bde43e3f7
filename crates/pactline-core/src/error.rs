//! Shared error type across pactline crates.

use thiserror::Error;

/// Stable error codes shown to the embedding application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Inbound frame did not match the envelope shape.
    Malformed,
    /// No bearer token was available at connect time.
    AuthMissing,
    /// A connection attempt is already in flight.
    ConnectInProgress,
    /// Socket-level failure.
    Transport,
    /// Automatic reconnects gave up.
    ReconnectExhausted,
    /// A pending connect was cancelled by `disconnect()`.
    Aborted,
    /// The session task is gone.
    SessionClosed,
    /// The server reported an error envelope.
    Server,
    /// Configuration rejected.
    InvalidConfig,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// String representation used in logs and error projections.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Malformed => "MALFORMED",
            ErrorCode::AuthMissing => "AUTH_MISSING",
            ErrorCode::ConnectInProgress => "CONNECT_IN_PROGRESS",
            ErrorCode::Transport => "TRANSPORT",
            ErrorCode::ReconnectExhausted => "RECONNECT_EXHAUSTED",
            ErrorCode::Aborted => "ABORTED",
            ErrorCode::SessionClosed => "SESSION_CLOSED",
            ErrorCode::Server => "SERVER",
            ErrorCode::InvalidConfig => "INVALID_CONFIG",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, PactError>;

/// Unified error type used by core and client.
///
/// `Clone` so the last error can be published to watchers as a projection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PactError {
    #[error("malformed envelope: {0}")]
    Malformed(String),
    #[error("no auth token available")]
    AuthMissing,
    #[error("connection already in progress")]
    ConnectInProgress,
    #[error("transport: {0}")]
    Transport(String),
    #[error("reconnect gave up after {attempts} attempts")]
    ReconnectExhausted { attempts: u32 },
    #[error("connection attempt aborted")]
    Aborted,
    #[error("session closed")]
    SessionClosed,
    #[error("server error: {0}")]
    Server(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl PactError {
    /// Map to a stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            PactError::Malformed(_) => ErrorCode::Malformed,
            PactError::AuthMissing => ErrorCode::AuthMissing,
            PactError::ConnectInProgress => ErrorCode::ConnectInProgress,
            PactError::Transport(_) => ErrorCode::Transport,
            PactError::ReconnectExhausted { .. } => ErrorCode::ReconnectExhausted,
            PactError::Aborted => ErrorCode::Aborted,
            PactError::SessionClosed => ErrorCode::SessionClosed,
            PactError::Server(_) => ErrorCode::Server,
            PactError::InvalidConfig(_) => ErrorCode::InvalidConfig,
            PactError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
            PactError::Internal(_) => ErrorCode::Internal,
        }
    }
}
