//! Account management
//!
//! Handles registration, credential verification and profile lookup.

pub mod password;
pub mod requests;
pub mod results;
pub mod service;
pub mod validator;

pub use password::CredentialHasher;
pub use requests::{LoginRequest, RegisterRequest};
pub use results::{Profile, Registered};
pub use service::AccountService;
