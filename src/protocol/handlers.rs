//! Command handlers
//!
//! Dispatches parsed commands to the account service and turns the outcome
//! into a response line.

use log::warn;
use serde::Serialize;

use crate::account::AccountService;
use crate::error::handlers::{
    error_code, error_message, error_to_status, handle_error, protocol_error_parts,
};
use crate::error::{AccountError, ProtocolError};
use crate::protocol::responses::{
    BAD_REQUEST, CREATED, GOODBYE, OK, format_error, format_message, format_response,
};
use crate::protocol::{Command, CommandResult, CommandStatus};
use crate::storage::AccountStore;

/// Executes a command against the account service.
pub async fn handle_command<S: AccountStore>(
    service: &AccountService<S>,
    command: Command,
) -> CommandResult {
    match command {
        Command::Register(request) => respond(service.register(request).await, CREATED),
        Command::Login(request) => respond(service.authenticate(request).await, OK),
        Command::Profile(id) => respond(service.get_profile(id).await, OK),
        Command::Quit => handle_cmd_quit(),
        Command::Invalid(err) => handle_protocol_error(&err),
    }
}

fn handle_cmd_quit() -> CommandResult {
    CommandResult {
        status: CommandStatus::CloseConnection,
        message: Some(format_message(GOODBYE, "goodbye")),
    }
}

/// Builds the failure response for a request line that could not be parsed.
pub fn handle_protocol_error(err: &ProtocolError) -> CommandResult {
    warn!("Rejected request: {}", err);
    let (code, message) = protocol_error_parts(err);

    CommandResult {
        status: CommandStatus::Failure(err.to_string()),
        message: Some(format_error(BAD_REQUEST, code, message)),
    }
}

fn respond<T: Serialize>(result: Result<T, AccountError>, success_code: u16) -> CommandResult {
    match result {
        Ok(body) => CommandResult {
            status: CommandStatus::Success,
            message: Some(format_response(success_code, &body)),
        },
        Err(err) => {
            handle_error(&err);
            CommandResult {
                status: CommandStatus::Failure(err.to_string()),
                message: Some(format_error(
                    error_to_status(&err),
                    error_code(&err),
                    error_message(&err),
                )),
            }
        }
    }
}
