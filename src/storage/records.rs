//! Account records
//!
//! Defines the persisted account record and the store contract.

use std::fmt;

use crate::error::StorageError;

/// System-assigned account identifier
pub type AccountId = i64;

/// A persisted account, including its password hash.
///
/// Only handed out by the store for credential checks and profile reads;
/// anything that leaves the service is projected to a `Profile` first.
#[derive(Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub phone: String,
    pub password_hash: String,
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("phone", &self.phone)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

/// Durable, uniqueness-enforcing account persistence.
///
/// `create_account` must be atomic: the phone uniqueness check and the insert
/// happen as one unit inside the store.
pub trait AccountStore: Send + Sync + 'static {
    fn create_account(
        &self,
        name: &str,
        phone: &str,
        password_hash: &str,
    ) -> Result<Account, StorageError>;

    fn find_by_phone(&self, phone: &str) -> Result<Option<Account>, StorageError>;

    fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, StorageError>;
}
