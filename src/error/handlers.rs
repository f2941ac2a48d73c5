//! Error handlers
//!
//! Maps errors to wire status codes, stable error codes and the short
//! messages that are safe to show a caller.

use crate::error::types::{AccountError, ProtocolError};
use crate::protocol::responses::{
    BAD_REQUEST, CONFLICT, INTERNAL_ERROR, NOT_FOUND, UNAUTHORIZED,
};
use log::{error, warn};

/// Log an account error at a level matching its severity
pub fn handle_error(err: &AccountError) {
    match err {
        AccountError::Storage(_) | AccountError::Hashing(_) | AccountError::Internal(_) => {
            error!("Account operation failed: {}", err)
        }
        AccountError::DuplicatePhone(_) => warn!("Registration rejected: phone already in use"),
        _ => {}
    }
}

/// Convert an account error to its response status
pub fn error_to_status(err: &AccountError) -> u16 {
    match err {
        AccountError::MissingField(_) => BAD_REQUEST,
        AccountError::FieldTooLong(_) => BAD_REQUEST,
        AccountError::DuplicatePhone(_) => CONFLICT,
        AccountError::InvalidPhone => BAD_REQUEST,
        AccountError::InvalidPassword => UNAUTHORIZED,
        AccountError::NotFound(_) => NOT_FOUND,
        AccountError::Storage(_) => INTERNAL_ERROR,
        AccountError::Hashing(_) => INTERNAL_ERROR,
        AccountError::Internal(_) => INTERNAL_ERROR,
    }
}

/// Stable machine-readable code for an account error
pub fn error_code(err: &AccountError) -> &'static str {
    match err {
        AccountError::MissingField(_) => "validation_failed",
        AccountError::FieldTooLong(_) => "field_too_long",
        AccountError::DuplicatePhone(_) => "phone_in_use",
        AccountError::InvalidPhone => "invalid_phone",
        AccountError::InvalidPassword => "invalid_password",
        AccountError::NotFound(_) => "not_found",
        AccountError::Storage(_) | AccountError::Hashing(_) | AccountError::Internal(_) => {
            "internal_error"
        }
    }
}

/// Public message for an account error. Never carries internal detail.
pub fn error_message(err: &AccountError) -> &'static str {
    match err {
        AccountError::MissingField(_) => "please fill in all fields",
        AccountError::FieldTooLong(_) => "a field exceeds the maximum length",
        AccountError::DuplicatePhone(_) => "phone number already in use",
        AccountError::InvalidPhone => "phone number incorrect",
        AccountError::InvalidPassword => "password incorrect",
        AccountError::NotFound(_) => "user not found",
        AccountError::Storage(_) | AccountError::Hashing(_) | AccountError::Internal(_) => {
            "an internal error occurred"
        }
    }
}

/// Stable code and public message for a request line error
pub fn protocol_error_parts(err: &ProtocolError) -> (&'static str, &'static str) {
    match err {
        ProtocolError::UnknownCommand(_) => ("unknown_command", "unknown command"),
        ProtocolError::MalformedBody(_) => ("malformed_request", "request body is not valid"),
        ProtocolError::InvalidId(_) => ("invalid_id", "account id must be an integer"),
        ProtocolError::RequestTooLong(_) => ("request_too_long", "request too long"),
    }
}
