//! # kvdb
//!
//! Blocking client for the key value db server:
//! - Length-prefixed framing (8-byte little-endian length + payload)
//! - Text commands: `get <key>`, `set <key> <value>`, `exit`
//! - Bounded reconnect when a request finds no active connection
//! - Connection released deterministically on close, replacement, or drop
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │              Caller (CLI, HTTP glue, tests)                  │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ get / set / close
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │            SharedClient (optional, Mutex<Client>)            │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                       Client                                 │
//! │        (state machine + reconnect policy)                    │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │ Connection  │          │  Protocol   │
//!   │ (TcpStream) │          │  (codec)    │
//!   └─────────────┘          └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use kvdb::Client;
//!
//! let mut client = Client::connect("localhost:6708")?;
//! client.set("greeting", "\"hello\"")?;
//! let value = client.get("greeting")?;
//! println!("{}", String::from_utf8_lossy(&value));
//! client.close()?;
//! # Ok::<(), kvdb::KvdbError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod network;
pub mod protocol;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ErrorKind, FrameError, KvdbError, Result};
pub use config::ClientConfig;
pub use network::{Client, ConnectionState, SharedClient};
pub use protocol::Command;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of kvdb
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
