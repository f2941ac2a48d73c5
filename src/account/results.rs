//! Account result types
//!
//! Defines result structures returned by account operations.

use serde::Serialize;

use crate::storage::{Account, AccountId};

/// Result of a successful registration
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Registered {
    pub id: AccountId,
}

/// Redacted view of an account, safe to return to callers
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Profile {
    pub id: AccountId,
    pub name: String,
    pub phone: String,
}

impl From<Account> for Profile {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            name: account.name,
            phone: account.phone,
        }
    }
}
