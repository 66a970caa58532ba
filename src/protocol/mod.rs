//! Protocol Module
//!
//! Defines the wire protocol spoken with the key value db server.
//!
//! ## Frame Format
//! ```text
//! ┌────────────────────┬─────────────────────────────┐
//! │  Len (8, i64 LE)   │         Payload             │
//! └────────────────────┴─────────────────────────────┘
//! ```
//!
//! ### Commands (request payload, UTF-8 text)
//! - `get <key>`
//! - `set <key> <value>`
//! - `exit` (no reply)
//!
//! ### Responses
//! Opaque bytes; the declared length must be greater than zero.

mod command;
mod codec;

pub use command::{Command, CommandType};
pub use codec::{
    decode_command, decode_response, encode_command, encode_frame, encode_response,
    read_command, read_response, write_command, write_response, LENGTH_PREFIX_SIZE,
    MAX_COMMAND_SIZE,
};
