//! Protocol Client
//!
//! Synchronous request/response client for the key value db server.
//!
//! ## Connection State
//! ```text
//!   Disconnected ──dial ok──▶ Connected
//!        ▲                        │
//!        └── close / I/O or framing failure
//! ```
//!
//! `get` and `set` issued while Disconnected first redial the stored address,
//! up to `reconnect_attempts` times with no delay between attempts.

use bytes::Bytes;

use super::Connection;
use crate::config::ClientConfig;
use crate::error::{KvdbError, Result};
use crate::protocol::Command;

/// Whether the client currently holds a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connected,
}

/// Client for one server endpoint
///
/// Every operation takes `&mut self`: one request is in flight at a time and
/// its frames never interleave with another caller's. Use
/// [`SharedClient`](super::SharedClient) to share a client between threads.
pub struct Client {
    /// Endpoint and socket settings, fixed for the client's lifetime
    config: ClientConfig,

    /// Active session, if any
    connection: Option<Connection>,
}

impl Client {
    /// Create a disconnected client for `addr`
    ///
    /// No socket is opened until the first `get`/`set` or an explicit
    /// `reconnect`.
    pub fn new(addr: impl Into<String>) -> Self {
        Self::with_config(ClientConfig::new(addr))
    }

    /// Create a disconnected client from a full config
    pub fn with_config(config: ClientConfig) -> Self {
        Self {
            config,
            connection: None,
        }
    }

    /// Connect to `addr`, failing if the dial fails
    pub fn connect(addr: impl Into<String>) -> Result<Self> {
        Self::open(ClientConfig::new(addr))
    }

    /// Validate `config` and connect, failing if the dial fails
    pub fn open(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let mut client = Self::with_config(config);
        client.reconnect()?;
        Ok(client)
    }

    /// Server address this client dials
    pub fn addr(&self) -> &str {
        &self.config.addr
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn state(&self) -> ConnectionState {
        match self.connection {
            Some(_) => ConnectionState::Connected,
            None => ConnectionState::Disconnected,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Fetch the value stored under `key`
    ///
    /// Returns the raw response payload.
    pub fn get(&mut self, key: &str) -> Result<Bytes> {
        self.request(Command::get(key))
    }

    /// Store `value` under `key`
    ///
    /// The value is sent verbatim after a single space; see [`Command`] for
    /// the whitespace caveat.
    pub fn set(&mut self, key: &str, value: &str) -> Result<Bytes> {
        self.request(Command::set(key, value))
    }

    /// Run a parsed command
    ///
    /// `Exit` closes the session and yields `None`.
    pub fn execute(&mut self, command: Command) -> Result<Option<Bytes>> {
        match command {
            Command::Exit => self.close().map(|()| None),
            command => self.request(command).map(Some),
        }
    }

    /// Send `exit` and release the connection
    ///
    /// No reply is read. The client is Disconnected afterwards even when the
    /// exit frame could not be written.
    pub fn close(&mut self) -> Result<()> {
        let mut connection = self.connection.take().ok_or(KvdbError::NotConnected)?;

        tracing::debug!("Closing connection to {}", connection.peer_addr());
        connection.send(&Command::Exit).map_err(KvdbError::SendExit)
    }

    /// Drop the current connection (if any) and dial the server once
    pub fn reconnect(&mut self) -> Result<()> {
        if let Some(previous) = self.connection.take() {
            tracing::debug!("Replacing connection to {}", previous.peer_addr());
        }

        let connection = Connection::open(&self.config).map_err(|source| KvdbError::Connect {
            addr: self.config.addr.clone(),
            source,
        })?;

        self.connection = Some(connection);
        Ok(())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn request(&mut self, command: Command) -> Result<Bytes> {
        if command.has_ambiguous_whitespace() {
            tracing::debug!(
                "Command {:?} has whitespace inside an argument; the server will split it",
                command.command_type().as_str()
            );
        }

        let max_size = self.config.max_response_size;
        let connection = self.ensure_connected()?;
        let result = exchange(connection, &command, max_size);

        if let Err(ref e) = result {
            self.discard_connection(e);
        }
        result
    }

    /// Return the live connection, redialing if there is none
    fn ensure_connected(&mut self) -> Result<&mut Connection> {
        if self.connection.is_none() {
            let connection = self.redial()?;
            self.connection = Some(connection);
        }
        self.connection.as_mut().ok_or(KvdbError::NotConnected)
    }

    fn redial(&self) -> Result<Connection> {
        let attempts = self.config.reconnect_attempts;
        let mut last_error = None;

        for attempt in 1..=attempts {
            match Connection::open(&self.config) {
                Ok(connection) => {
                    tracing::info!(
                        "Reconnected to {} (attempt {}/{})",
                        self.config.addr,
                        attempt,
                        attempts
                    );
                    return Ok(connection);
                }
                Err(e) => {
                    tracing::warn!(
                        "Reconnect to {} failed (attempt {}/{}): {}",
                        self.config.addr,
                        attempt,
                        attempts,
                        e
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(KvdbError::NoActiveConnection {
            attempts,
            source: last_error,
        })
    }

    /// Forget a connection whose stream state can no longer be trusted
    fn discard_connection(&mut self, reason: &KvdbError) {
        if let Some(connection) = self.connection.take() {
            tracing::warn!(
                "Dropping connection to {}: {}",
                connection.peer_addr(),
                reason
            );
        }
    }
}

/// Send one command and read its response
fn exchange(connection: &mut Connection, command: &Command, max_size: u64) -> Result<Bytes> {
    connection
        .send(command)
        .map_err(KvdbError::SendRequest)?;
    Ok(connection.receive(max_size)?)
}
