//! Response handling
//!
//! Defines response status codes and the `<status> <json>` line format.

use serde::Serialize;

pub const OK: u16 = 200;
pub const CREATED: u16 = 201;
pub const READY: u16 = 220;
pub const GOODBYE: u16 = 221;
pub const BAD_REQUEST: u16 = 400;
pub const UNAUTHORIZED: u16 = 401;
pub const NOT_FOUND: u16 = 404;
pub const CONFLICT: u16 = 409;
pub const INTERNAL_ERROR: u16 = 500;
pub const SERVICE_UNAVAILABLE: u16 = 503;

/// Body of every failure response
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub error: &'a str,
    pub message: &'a str,
}

/// Body for informational responses (greeting, goodbye)
#[derive(Debug, Serialize)]
pub struct MessageBody<'a> {
    pub message: &'a str,
}

/// Format a response line with a JSON body
pub fn format_response<T: Serialize>(code: u16, body: &T) -> String {
    let json = serde_json::to_string(body).unwrap_or_else(|_| "{}".to_string());
    format!("{} {}\r\n", code, json)
}

pub fn format_error(code: u16, error: &str, message: &str) -> String {
    format_response(code, &ErrorBody { error, message })
}

pub fn format_message(code: u16, message: &str) -> String {
    format_response(code, &MessageBody { message })
}
