//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! ## Wire Format
//!
//! Requests and responses share one frame layout:
//! ```text
//! ┌────────────────────┬─────────────────────────────┐
//! │  Len (8, i64 LE)   │         Payload             │
//! └────────────────────┴─────────────────────────────┘
//! ```
//!
//! - Request payload: UTF-8 command text (`get k`, `set k v`, `exit`)
//! - Response payload: opaque bytes, never empty
//!
//! A single `read` on a TCP stream may return fewer bytes than asked for, so
//! the stream helpers keep reading until the frame is complete or the peer
//! closes the connection.

use std::io::{self, Read, Write};

use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::Command;
use crate::error::{FrameError, KvdbError, Result};

/// Length prefix size: one little-endian i64
pub const LENGTH_PREFIX_SIZE: usize = 8;

/// Maximum command payload size (16 MB)
pub const MAX_COMMAND_SIZE: u64 = 16 * 1024 * 1024;

// =============================================================================
// Frame Encoding
// =============================================================================

/// Encode a payload as a frame
///
/// Format: payload_len (8, LE) + payload
pub fn encode_frame(payload: &[u8]) -> Bytes {
    let mut frame = BytesMut::with_capacity(LENGTH_PREFIX_SIZE + payload.len());
    frame.put_i64_le(payload.len() as i64);
    frame.put_slice(payload);
    frame.freeze()
}

/// Validate a declared frame length against the protocol and a size cap
fn check_length(declared: i64, max: u64) -> std::result::Result<usize, FrameError> {
    if declared <= 0 {
        return Err(FrameError::InvalidLength(declared));
    }
    let len = declared as u64;
    if len > max {
        return Err(FrameError::TooLarge { len, max });
    }
    Ok(len as usize)
}

// =============================================================================
// Command Encoding/Decoding
// =============================================================================

/// Encode a command to a request frame
pub fn encode_command(command: &Command) -> Bytes {
    encode_frame(command.to_string().as_bytes())
}

/// Decode a command from a complete request frame
pub fn decode_command(bytes: &[u8]) -> Result<Command> {
    if bytes.len() < LENGTH_PREFIX_SIZE {
        return Err(KvdbError::Protocol(format!(
            "Incomplete command length: expected {} bytes, got {}",
            LENGTH_PREFIX_SIZE,
            bytes.len()
        )));
    }

    let mut buf = bytes;
    let declared = buf.get_i64_le();
    let len = check_length(declared, MAX_COMMAND_SIZE)
        .map_err(|e| KvdbError::Protocol(format!("Bad command frame: {}", e)))?;

    if buf.remaining() < len {
        return Err(KvdbError::Protocol(format!(
            "Incomplete command: expected {} bytes, got {}",
            len,
            buf.remaining()
        )));
    }

    parse_command_payload(&buf[..len])
}

fn parse_command_payload(payload: &[u8]) -> Result<Command> {
    let text = std::str::from_utf8(payload)
        .map_err(|e| KvdbError::Protocol(format!("Command is not UTF-8: {}", e)))?;
    Command::parse(text)
}

// =============================================================================
// Response Encoding/Decoding
// =============================================================================

/// Encode a response payload to a frame
pub fn encode_response(payload: &[u8]) -> Bytes {
    encode_frame(payload)
}

/// Decode a response payload from a buffered frame
pub fn decode_response(bytes: &[u8], max: u64) -> std::result::Result<Bytes, FrameError> {
    if bytes.len() < LENGTH_PREFIX_SIZE {
        return Err(FrameError::ShortLength {
            received: bytes.len(),
        });
    }

    let mut buf = bytes;
    let len = check_length(buf.get_i64_le(), max)?;

    if buf.remaining() < len {
        return Err(FrameError::Incomplete {
            expected: len,
            received: buf.remaining(),
        });
    }

    Ok(Bytes::copy_from_slice(&buf[..len]))
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read into `buf` until it is full or the reader reaches EOF
///
/// Returns the number of bytes read.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Read a complete response frame from a stream
///
/// Blocks until the declared payload has arrived, the peer closes the
/// connection, or the read fails.
pub fn read_response<R: Read>(reader: &mut R, max: u64) -> std::result::Result<Bytes, FrameError> {
    let mut prefix = [0u8; LENGTH_PREFIX_SIZE];
    let got = read_full(reader, &mut prefix).map_err(FrameError::ReadLength)?;
    if got < LENGTH_PREFIX_SIZE {
        return Err(FrameError::ShortLength { received: got });
    }

    let len = check_length(i64::from_le_bytes(prefix), max)?;

    let mut payload = BytesMut::zeroed(len);
    let received = read_full(reader, &mut payload).map_err(FrameError::ReadPayload)?;
    if received < len {
        return Err(FrameError::Incomplete {
            expected: len,
            received,
        });
    }

    Ok(payload.freeze())
}

/// Write a response frame to a stream
pub fn write_response<W: Write>(writer: &mut W, payload: &[u8]) -> io::Result<()> {
    writer.write_all(&encode_response(payload))?;
    writer.flush()
}

/// Read a complete command from a stream
pub fn read_command<R: Read>(reader: &mut R) -> Result<Command> {
    let mut prefix = [0u8; LENGTH_PREFIX_SIZE];
    reader.read_exact(&mut prefix)?;

    let len = check_length(i64::from_le_bytes(prefix), MAX_COMMAND_SIZE)
        .map_err(|e| KvdbError::Protocol(format!("Bad command frame: {}", e)))?;

    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload)?;

    parse_command_payload(&payload)
}

/// Write a command to a stream
pub fn write_command<W: Write>(writer: &mut W, command: &Command) -> io::Result<()> {
    writer.write_all(&encode_command(command))?;
    writer.flush()
}
