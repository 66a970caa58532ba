//! Connection
//!
//! One established TCP session with the server. Dropping a `Connection`
//! shuts the socket down, so replacing or discarding it always releases the
//! previous stream.

use std::io::{self, BufReader, BufWriter};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use bytes::Bytes;

use crate::config::ClientConfig;
use crate::error::FrameError;
use crate::protocol::{read_response, write_command, Command};

/// An exclusively owned TCP session with the server
pub struct Connection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Dial the configured address and apply socket options
    pub fn open(config: &ClientConfig) -> io::Result<Self> {
        let stream = match config.connect_timeout() {
            Some(timeout) => connect_timeout(&config.addr, timeout)?,
            None => TcpStream::connect(config.addr.as_str())?,
        };

        stream.set_nodelay(config.nodelay)?;

        let mut connection = Self::new(stream)?;
        connection.set_timeouts(config.read_timeout(), config.write_timeout())?;

        tracing::debug!("Connected to {}", connection.peer_addr);
        Ok(connection)
    }

    /// Wrap an already connected stream
    pub fn new(stream: TcpStream) -> io::Result<Self> {
        // Get peer address for logging before we split the stream
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Clone stream for separate read/write handles
        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            peer_addr,
        })
    }

    /// Configure socket timeouts (`None` blocks indefinitely)
    pub fn set_timeouts(
        &mut self,
        read: Option<Duration>,
        write: Option<Duration>,
    ) -> io::Result<()> {
        self.reader.get_ref().set_read_timeout(read)?;
        self.writer.get_ref().set_write_timeout(write)?;
        Ok(())
    }

    /// Write one command frame and flush it
    pub fn send(&mut self, command: &Command) -> io::Result<()> {
        tracing::trace!("Sending to {}: {:?}", self.peer_addr, command);
        write_command(&mut self.writer, command)
    }

    /// Read one response frame
    pub fn receive(&mut self, max_size: u64) -> Result<Bytes, FrameError> {
        let payload = read_response(&mut self.reader, max_size)?;
        tracing::trace!("Received {} bytes from {}", payload.len(), self.peer_addr);
        Ok(payload)
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        // The write half is always flushed after each frame; a shutdown error
        // only means the peer is already gone.
        if let Err(e) = self.writer.get_ref().shutdown(Shutdown::Both) {
            tracing::trace!("Shutdown of {} failed: {}", self.peer_addr, e);
        }
        tracing::debug!("Connection to {} released", self.peer_addr);
    }
}

/// Dial every resolved address in turn, each bounded by `timeout`
fn connect_timeout(addr: &str, timeout: Duration) -> io::Result<TcpStream> {
    let mut last_error = None;

    for socket_addr in addr.to_socket_addrs()? {
        match TcpStream::connect_timeout(&socket_addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => last_error = Some(e),
        }
    }

    Err(last_error.unwrap_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} did not resolve to any address", addr),
        )
    }))
}
