//! Configuration for the kvdb client
//!
//! Centralized configuration with sensible defaults.

use std::time::Duration;

use crate::error::{KvdbError, Result};

/// Default server endpoint (the key value db server listens on 6708)
pub const DEFAULT_ADDR: &str = "localhost:6708";

/// Dial attempts made by `get`/`set` when no connection is active
pub const DEFAULT_RECONNECT_ATTEMPTS: u32 = 3;

/// Largest response payload accepted (16 MB)
pub const DEFAULT_MAX_RESPONSE_SIZE: u64 = 16 * 1024 * 1024;

/// Main configuration for a client instance
#[derive(Debug, Clone)]
pub struct ClientConfig {
    // -------------------------------------------------------------------------
    // Endpoint Configuration
    // -------------------------------------------------------------------------
    /// Server address (host:port), used for the initial dial and every reconnect
    pub addr: String,

    /// Dial attempts before giving up with "no active connection"
    pub reconnect_attempts: u32,

    // -------------------------------------------------------------------------
    // Socket Configuration
    // -------------------------------------------------------------------------
    /// Connect timeout (milliseconds, 0 = block until the OS gives up)
    pub connect_timeout_ms: u64,

    /// Read timeout (milliseconds, 0 = disabled)
    pub read_timeout_ms: u64,

    /// Write timeout (milliseconds, 0 = disabled)
    pub write_timeout_ms: u64,

    /// Disable Nagle's algorithm
    pub nodelay: bool,

    // -------------------------------------------------------------------------
    // Protocol Configuration
    // -------------------------------------------------------------------------
    /// Declared response lengths above this are rejected before allocating
    pub max_response_size: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            reconnect_attempts: DEFAULT_RECONNECT_ATTEMPTS,
            connect_timeout_ms: 0,
            read_timeout_ms: 0,
            write_timeout_ms: 0,
            nodelay: true,
            max_response_size: DEFAULT_MAX_RESPONSE_SIZE,
        }
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Default config pointed at `addr`
    pub fn new(addr: impl Into<String>) -> Self {
        Self::builder().addr(addr).build()
    }

    /// Check that the config can be used to dial
    pub fn validate(&self) -> Result<()> {
        if self.addr.trim().is_empty() {
            return Err(KvdbError::Config("server address is empty".to_string()));
        }
        if self.reconnect_attempts == 0 {
            return Err(KvdbError::Config(
                "reconnect_attempts must be at least 1".to_string(),
            ));
        }
        if self.max_response_size == 0 {
            return Err(KvdbError::Config(
                "max_response_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub(crate) fn connect_timeout(&self) -> Option<Duration> {
        millis(self.connect_timeout_ms)
    }

    pub(crate) fn read_timeout(&self) -> Option<Duration> {
        millis(self.read_timeout_ms)
    }

    pub(crate) fn write_timeout(&self) -> Option<Duration> {
        millis(self.write_timeout_ms)
    }
}

fn millis(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

/// Builder for ClientConfig
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the server address (host:port)
    pub fn addr(mut self, addr: impl Into<String>) -> Self {
        self.config.addr = addr.into();
        self
    }

    /// Set how many dial attempts `get`/`set` make when disconnected
    pub fn reconnect_attempts(mut self, attempts: u32) -> Self {
        self.config.reconnect_attempts = attempts;
        self
    }

    /// Set the connect timeout (in milliseconds)
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Enable or disable TCP_NODELAY
    pub fn nodelay(mut self, nodelay: bool) -> Self {
        self.config.nodelay = nodelay;
        self
    }

    /// Set the maximum accepted response payload (in bytes)
    pub fn max_response_size(mut self, bytes: u64) -> Self {
        self.config.max_response_size = bytes;
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}
