//! Network Module
//!
//! TCP client for the key value db server.
//!
//! ## Architecture
//! - `Connection`: one owned TCP session, released on drop
//! - `Client`: request/response operations and reconnect policy
//! - `SharedClient`: mutex-guarded handle for multi-threaded callers

mod connection;
mod client;
mod shared;

pub use connection::Connection;
pub use client::{Client, ConnectionState};
pub use shared::SharedClient;
