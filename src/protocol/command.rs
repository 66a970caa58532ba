//! Command definitions
//!
//! Represents the text commands a client sends to the server.

use std::fmt;

use crate::error::{KvdbError, Result};

/// Command types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    Get,
    Set,
    Exit,
}

impl CommandType {
    /// Verb as it appears on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandType::Get => "get",
            CommandType::Set => "set",
            CommandType::Exit => "exit",
        }
    }
}

/// A client command
///
/// Arguments are space-delimited on the wire with no escaping. A key
/// containing whitespace, or a value the server cannot read as one token,
/// will not be understood by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Get a value by key
    Get { key: String },

    /// Set a key to a value
    Set { key: String, value: String },

    /// End the session; the server sends no reply
    Exit,
}

impl Command {
    pub fn get(key: impl Into<String>) -> Self {
        Command::Get { key: key.into() }
    }

    pub fn set(key: impl Into<String>, value: impl Into<String>) -> Self {
        Command::Set {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Get { .. } => CommandType::Get,
            Command::Set { .. } => CommandType::Set,
            Command::Exit => CommandType::Exit,
        }
    }

    /// True when the server's tokenizer would split an argument apart
    pub fn has_ambiguous_whitespace(&self) -> bool {
        match self {
            Command::Get { key } => key.contains(char::is_whitespace),
            Command::Set { key, value } => {
                key.contains(char::is_whitespace) || value.contains(char::is_whitespace)
            }
            Command::Exit => false,
        }
    }

    /// Parse a command line
    ///
    /// `get <key>`, `set <key> <value>` or `exit`. The key is a single
    /// token; the value of `set` is everything after the key's trailing
    /// space, as the server reads it.
    pub fn parse(line: &str) -> Result<Command> {
        let (verb, rest) = match line.split_once(' ') {
            Some((verb, rest)) => (verb, Some(rest)),
            None => (line, None),
        };

        match (verb, rest) {
            ("exit", None) => Ok(Command::Exit),
            ("exit", Some(_)) => Err(KvdbError::Protocol(
                "exit command: unexpected arguments".to_string(),
            )),
            ("get", Some(key)) => {
                validate_key("get", key)?;
                Ok(Command::get(key))
            }
            ("set", Some(rest)) => {
                let (key, value) = rest.split_once(' ').ok_or_else(|| {
                    KvdbError::Protocol("set command: missing value".to_string())
                })?;
                validate_key("set", key)?;
                Ok(Command::set(key, value))
            }
            ("get", None) | ("set", None) => Err(KvdbError::Protocol(format!(
                "{} command: missing key",
                verb
            ))),
            _ => Err(KvdbError::Protocol(format!("Unknown command: {:?}", verb))),
        }
    }
}

fn validate_key(verb: &str, key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(KvdbError::Protocol(format!("{} command: missing key", verb)));
    }
    if key.contains(char::is_whitespace) {
        return Err(KvdbError::Protocol(format!(
            "{} command: key {:?} contains whitespace",
            verb, key
        )));
    }
    Ok(())
}

impl fmt::Display for Command {
    /// Wire text of the command
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Get { key } => write!(f, "get {}", key),
            Command::Set { key, value } => write!(f, "set {} {}", key, value),
            Command::Exit => f.write_str("exit"),
        }
    }
}
