//! Account storage
//!
//! Handles durable account persistence and phone uniqueness.

pub mod records;
pub mod sqlite;

pub use records::{Account, AccountId, AccountStore};
pub use sqlite::SqliteAccountStore;
