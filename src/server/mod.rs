//! Server core functionality
//!
//! Contains the listener and accept loop for the account server.

pub mod core;

pub use self::core::Server;
