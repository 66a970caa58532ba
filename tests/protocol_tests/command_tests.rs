//! Command Tests
//!
//! Tests for parsing command lines and rendering them as wire text.

use kvdb::protocol::{Command, CommandType};

// =============================================================================
// Parsing Tests
// =============================================================================

#[test]
fn test_parse_get() {
    assert_eq!(Command::parse("get user:1").unwrap(), Command::get("user:1"));
}

#[test]
fn test_parse_set_takes_rest_of_line_as_value() {
    let cmd = Command::parse("set profile {\"name\": \"ada\"}").unwrap();
    assert_eq!(cmd, Command::set("profile", "{\"name\": \"ada\"}"));
}

#[test]
fn test_parse_exit() {
    assert_eq!(Command::parse("exit").unwrap(), Command::Exit);
}

#[test]
fn test_parse_missing_key() {
    for line in ["get", "get ", "set", "set "] {
        let err = Command::parse(line).unwrap_err();
        assert!(err.to_string().contains("missing"), "{}: {}", line, err);
    }
}

#[test]
fn test_parse_set_missing_value() {
    let err = Command::parse("set key").unwrap_err();
    assert!(err.to_string().contains("missing value"));
}

#[test]
fn test_parse_get_rejects_key_with_whitespace() {
    let err = Command::parse("get two words").unwrap_err();
    assert!(err.to_string().contains("whitespace"));
}

#[test]
fn test_parse_unknown_and_exit_arguments() {
    assert!(Command::parse("list").is_err());
    assert!(Command::parse("GET key").is_err());
    assert!(Command::parse("exit now").is_err());
    assert!(Command::parse("").is_err());
}

// =============================================================================
// Rendering Tests
// =============================================================================

#[test]
fn test_display_is_wire_text() {
    assert_eq!(Command::get("k").to_string(), "get k");
    assert_eq!(Command::set("k", "v").to_string(), "set k v");
    assert_eq!(Command::Exit.to_string(), "exit");
}

#[test]
fn test_command_type() {
    assert_eq!(Command::get("k").command_type(), CommandType::Get);
    assert_eq!(Command::set("k", "v").command_type().as_str(), "set");
    assert_eq!(Command::Exit.command_type(), CommandType::Exit);
}

#[test]
fn test_ambiguous_whitespace() {
    assert!(!Command::set("k", "42").has_ambiguous_whitespace());
    assert!(Command::set("k", "a b").has_ambiguous_whitespace());
    assert!(Command::get("a\tb").has_ambiguous_whitespace());
    assert!(!Command::Exit.has_ambiguous_whitespace());
}
