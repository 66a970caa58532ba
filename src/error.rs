//! Error types for kvdb
//!
//! `KvdbError` is what every client operation returns. Framing failures while
//! reading a response are described by `FrameError` and surface wrapped in
//! `KvdbError::Response`, so the message always names the failed stage.

use thiserror::Error;

/// Result type alias using KvdbError
pub type Result<T> = std::result::Result<T, KvdbError>;

/// Broad category of a failure, used by callers to pick a response code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No usable connection to the server
    Connection,
    /// A socket read or write failed
    Transport,
    /// The peer sent a frame that violates the protocol
    Protocol,
    /// The operation was invoked in a state that does not allow it
    Usage,
    /// The client configuration is invalid
    Config,
}

/// Unified error type for client operations
#[derive(Debug, Error)]
pub enum KvdbError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Connection Errors
    // -------------------------------------------------------------------------
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Every reconnect attempt failed; `source` is the last dial error
    #[error("no active connection")]
    NoActiveConnection {
        attempts: u32,
        #[source]
        source: Option<std::io::Error>,
    },

    // -------------------------------------------------------------------------
    // Usage Errors
    // -------------------------------------------------------------------------
    #[error("no active connection")]
    NotConnected,

    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("failed to send request: {0}")]
    SendRequest(#[source] std::io::Error),

    #[error("failed to send exit command: {0}")]
    SendExit(#[source] std::io::Error),

    // -------------------------------------------------------------------------
    // Response Errors
    // -------------------------------------------------------------------------
    #[error("failed to parse response: {0}")]
    Response(#[from] FrameError),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl KvdbError {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            KvdbError::Connect { .. } | KvdbError::NoActiveConnection { .. } => {
                ErrorKind::Connection
            }
            KvdbError::NotConnected => ErrorKind::Usage,
            KvdbError::Io(_) | KvdbError::SendRequest(_) | KvdbError::SendExit(_) => ErrorKind::Transport,
            KvdbError::Response(frame) => frame.kind(),
            KvdbError::Protocol(_) => ErrorKind::Protocol,
            KvdbError::Config(_) => ErrorKind::Config,
        }
    }
}

/// Failure while reading a length-prefixed frame off the wire
#[derive(Debug, Error)]
pub enum FrameError {
    /// Reading the 8-byte length prefix failed
    #[error("failed to read response length: {0}")]
    ReadLength(#[source] std::io::Error),

    /// The peer closed the stream inside the length prefix
    #[error("failed to read response length: connection closed after {received} of 8 bytes")]
    ShortLength { received: usize },

    #[error("invalid response length: {0}")]
    InvalidLength(i64),

    #[error("response too large: {len} bytes (max {max})")]
    TooLarge { len: u64, max: u64 },

    /// The peer closed the stream before the declared payload arrived
    #[error("incomplete response: expected {expected} bytes, got {received}")]
    Incomplete { expected: usize, received: usize },

    #[error("failed to read response payload: {0}")]
    ReadPayload(#[source] std::io::Error),
}

impl FrameError {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            FrameError::ReadLength(_) | FrameError::ReadPayload(_) => ErrorKind::Transport,
            FrameError::ShortLength { .. }
            | FrameError::InvalidLength(_)
            | FrameError::TooLarge { .. }
            | FrameError::Incomplete { .. } => ErrorKind::Protocol,
        }
    }
}
