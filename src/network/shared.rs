//! Shared Client
//!
//! A cloneable handle that serializes access to one `Client`, for callers
//! such as HTTP handlers that run on several threads.

use std::sync::Arc;

use bytes::Bytes;
use parking_lot::Mutex;

use super::{Client, ConnectionState};
use crate::error::Result;

/// Mutex-guarded client handle
///
/// Each call holds the lock for one full request/response exchange, so frames
/// from different threads never interleave on the socket.
#[derive(Clone)]
pub struct SharedClient {
    inner: Arc<Mutex<Client>>,
}

impl SharedClient {
    pub fn new(client: Client) -> Self {
        Self {
            inner: Arc::new(Mutex::new(client)),
        }
    }

    pub fn get(&self, key: &str) -> Result<Bytes> {
        self.inner.lock().get(key)
    }

    pub fn set(&self, key: &str, value: &str) -> Result<Bytes> {
        self.inner.lock().set(key, value)
    }

    pub fn close(&self) -> Result<()> {
        self.inner.lock().close()
    }

    pub fn reconnect(&self) -> Result<()> {
        self.inner.lock().reconnect()
    }

    pub fn state(&self) -> ConnectionState {
        self.inner.lock().state()
    }

    /// Run several operations under one lock
    pub fn with<T>(&self, f: impl FnOnce(&mut Client) -> T) -> T {
        f(&mut *self.inner.lock())
    }
}

impl From<Client> for SharedClient {
    fn from(client: Client) -> Self {
        Self::new(client)
    }
}
