//! Error types
//!
//! Defines domain-specific error types for each layer of the account server.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Account store errors
#[derive(Debug)]
pub enum StorageError {
    DuplicatePhone(String),
    EmptyField(&'static str),
    CreateDirectory { path: PathBuf, source: io::Error },
    Open { path: PathBuf, source: rusqlite::Error },
    Database(rusqlite::Error),
    LockPoisoned,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::DuplicatePhone(p) => write!(f, "Phone already registered: {}", p),
            StorageError::EmptyField(field) => write!(f, "Empty value for column: {}", field),
            StorageError::CreateDirectory { path, source } => {
                write!(f, "Failed to create directory {}: {}", path.display(), source)
            }
            StorageError::Open { path, source } => {
                write!(f, "Failed to open database at {}: {}", path.display(), source)
            }
            StorageError::Database(e) => write!(f, "Database error: {}", e),
            StorageError::LockPoisoned => write!(f, "Database connection lock poisoned"),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<rusqlite::Error> for StorageError {
    fn from(error: rusqlite::Error) -> Self {
        StorageError::Database(error)
    }
}

/// Account service errors
#[derive(Debug)]
pub enum AccountError {
    MissingField(&'static str),
    FieldTooLong(&'static str),
    DuplicatePhone(String),
    InvalidPhone,
    InvalidPassword,
    NotFound(i64),
    Storage(StorageError),
    Hashing(String),
    Internal(String),
}

impl AccountError {
    /// Returns true for the validation family (rejected before any store access).
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AccountError::MissingField(_) | AccountError::FieldTooLong(_)
        )
    }
}

impl fmt::Display for AccountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountError::MissingField(field) => write!(f, "Missing required field: {}", field),
            AccountError::FieldTooLong(field) => write!(f, "Field too long: {}", field),
            AccountError::DuplicatePhone(p) => write!(f, "Phone already in use: {}", p),
            AccountError::InvalidPhone => write!(f, "No account for the given phone"),
            AccountError::InvalidPassword => write!(f, "Password does not match"),
            AccountError::NotFound(id) => write!(f, "Account not found: {}", id),
            AccountError::Storage(e) => write!(f, "Storage error: {}", e),
            AccountError::Hashing(e) => write!(f, "Password hashing error: {}", e),
            AccountError::Internal(e) => write!(f, "Internal error: {}", e),
        }
    }
}

impl std::error::Error for AccountError {}

impl From<StorageError> for AccountError {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::DuplicatePhone(phone) => AccountError::DuplicatePhone(phone),
            other => AccountError::Storage(other),
        }
    }
}

/// Request line errors, detected before the service is invoked
#[derive(Debug, PartialEq)]
pub enum ProtocolError {
    UnknownCommand(String),
    MalformedBody(String),
    InvalidId(String),
    RequestTooLong(usize),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::UnknownCommand(c) => write!(f, "Unknown command: {}", c),
            ProtocolError::MalformedBody(e) => write!(f, "Malformed request body: {}", e),
            ProtocolError::InvalidId(s) => write!(f, "Invalid account id: {}", s),
            ProtocolError::RequestTooLong(max) => {
                write!(f, "Request exceeds {} bytes", max)
            }
        }
    }
}

impl std::error::Error for ProtocolError {}

/// Startup and runtime failures of the server process
#[derive(Debug)]
pub enum ServerError {
    Config(config::ConfigError),
    Storage(StorageError),
    Account(AccountError),
    Bind(String, io::Error),
    IoError(io::Error),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::Config(e) => write!(f, "Configuration error: {}", e),
            ServerError::Storage(e) => write!(f, "Storage error: {}", e),
            ServerError::Account(e) => write!(f, "Account service error: {}", e),
            ServerError::Bind(addr, e) => write!(f, "Failed to bind to {}: {}", addr, e),
            ServerError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for ServerError {}

impl From<config::ConfigError> for ServerError {
    fn from(error: config::ConfigError) -> Self {
        ServerError::Config(error)
    }
}

impl From<StorageError> for ServerError {
    fn from(error: StorageError) -> Self {
        ServerError::Storage(error)
    }
}

impl From<AccountError> for ServerError {
    fn from(error: AccountError) -> Self {
        ServerError::Account(error)
    }
}

impl From<io::Error> for ServerError {
    fn from(error: io::Error) -> Self {
        ServerError::IoError(error)
    }
}
