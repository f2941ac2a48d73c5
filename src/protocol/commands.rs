//! Module `commands`
//!
//! Defines the request line format and parsing into typed commands.
//!
//! A request is a single line: a verb, optionally followed by whitespace and
//! an argument. `REGISTER` and `LOGIN` take a JSON object, `PROFILE` takes an
//! integer account id.

use serde::de::DeserializeOwned;

use crate::account::{LoginRequest, RegisterRequest};
use crate::error::ProtocolError;
use crate::storage::AccountId;

/// A parsed client request.
#[derive(Debug, PartialEq)]
pub enum Command {
    Register(RegisterRequest),
    Login(LoginRequest),
    Profile(AccountId),
    Quit,
    Invalid(ProtocolError),
}

impl Command {
    /// Verb name used in logs.
    pub fn verb(&self) -> &'static str {
        match self {
            Command::Register(_) => "REGISTER",
            Command::Login(_) => "LOGIN",
            Command::Profile(_) => "PROFILE",
            Command::Quit => "QUIT",
            Command::Invalid(_) => "INVALID",
        }
    }
}

/// Outcome of executing a command.
#[derive(Debug, PartialEq)]
pub enum CommandStatus {
    Success,
    Failure(String),
    CloseConnection,
}

/// Full result of a command: status plus the response line to send.
#[derive(Debug)]
pub struct CommandResult {
    pub status: CommandStatus,
    pub message: Option<String>,
}

/// Parses a raw request line into a `Command`.
///
/// Never fails: unusable input becomes `Command::Invalid`.
pub fn parse_command(raw: &str) -> Command {
    let trimmed = raw.trim();
    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let verb = parts.next().unwrap_or("").to_ascii_uppercase();
    let arg = parts.next().unwrap_or("").trim();

    let parsed = match verb.as_str() {
        "REGISTER" => parse_body(arg).map(Command::Register),
        "LOGIN" => parse_body(arg).map(Command::Login),
        "PROFILE" => parse_id(arg).map(Command::Profile),
        "QUIT" => Ok(Command::Quit),
        _ => Err(ProtocolError::UnknownCommand(verb)),
    };

    parsed.unwrap_or_else(Command::Invalid)
}

/// An absent body is treated as `{}` so the service reports the missing fields.
fn parse_body<T: DeserializeOwned + Default>(arg: &str) -> Result<T, ProtocolError> {
    if arg.is_empty() {
        return Ok(T::default());
    }

    serde_json::from_str(arg).map_err(|e| ProtocolError::MalformedBody(e.to_string()))
}

fn parse_id(arg: &str) -> Result<AccountId, ProtocolError> {
    arg.parse::<AccountId>()
        .map_err(|_| ProtocolError::InvalidId(arg.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_register() {
        let cmd = parse_command(
            "REGISTER {\"name\":\"A\",\"phone\":\"555\",\"password\":\"p1\"}\r\n",
        );
        assert_eq!(cmd, Command::Register(RegisterRequest::new("A", "555", "p1")));
    }

    #[test]
    fn test_verbs_are_case_insensitive() {
        let cmd = parse_command("login {\"phone\":\"555\",\"password\":\"p1\"}");
        assert_eq!(cmd, Command::Login(LoginRequest::new("555", "p1")));
        assert_eq!(parse_command("quit"), Command::Quit);
    }

    #[test]
    fn test_field_values_keep_whitespace() {
        let cmd = parse_command("REGISTER {\"name\":\"A B\",\"phone\":\" 555 \",\"password\":\"p 1\"}");
        assert_eq!(
            cmd,
            Command::Register(RegisterRequest::new("A B", " 555 ", "p 1"))
        );
    }

    #[test]
    fn test_missing_body_is_empty_request() {
        assert_eq!(
            parse_command("REGISTER"),
            Command::Register(RegisterRequest::default())
        );
    }

    #[test]
    fn test_malformed_body() {
        assert!(matches!(
            parse_command("REGISTER {not json"),
            Command::Invalid(ProtocolError::MalformedBody(_))
        ));
        assert!(matches!(
            parse_command("LOGIN {\"phone\":555}"),
            Command::Invalid(ProtocolError::MalformedBody(_))
        ));
    }

    #[test]
    fn test_parse_profile() {
        assert_eq!(parse_command("PROFILE 42"), Command::Profile(42));
        assert_eq!(
            parse_command("PROFILE abc"),
            Command::Invalid(ProtocolError::InvalidId("abc".into()))
        );
        assert_eq!(
            parse_command("PROFILE"),
            Command::Invalid(ProtocolError::InvalidId(String::new()))
        );
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(
            parse_command("DELETE 1"),
            Command::Invalid(ProtocolError::UnknownCommand("DELETE".into()))
        );
    }
}
