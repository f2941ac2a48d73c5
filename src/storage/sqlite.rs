//! SQLite account store
//!
//! Persists accounts in a single `accounts` table. Phone uniqueness is
//! enforced by a UNIQUE constraint, so concurrent registrations for the same
//! phone resolve inside SQLite rather than in the service layer.

use log::{debug, info};
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, ffi, params};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::error::StorageError;
use crate::storage::records::{Account, AccountId, AccountStore};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS accounts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    phone TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL
)";

/// SQLite-backed account store.
///
/// The connection is owned by the store and shared between clones. Every
/// operation, lookups included, takes the one connection mutex, so reads queue
/// behind a FULL-sync insert until its commit reaches disk.
#[derive(Clone, Debug)]
pub struct SqliteAccountStore {
    conn: Arc<Mutex<Connection>>,
    path: Option<PathBuf>,
}

impl SqliteAccountStore {
    /// Open (or create) the database file at `path` and ensure the schema exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| {
                    StorageError::CreateDirectory {
                        path: parent.to_path_buf(),
                        source,
                    }
                })?;
            }
        }

        let conn = Connection::open(&path).map_err(|source| StorageError::Open {
            path: path.clone(),
            source,
        })?;

        // WAL survives a crash mid-write and keeps outside readers of the file unblocked;
        // FULL so a commit is on disk before it returns
        let journal_mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        debug!("SQLite journal mode: {}", journal_mode);
        conn.pragma_update(None, "synchronous", "FULL")?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        init_schema(&conn)?;

        info!("Account store opened at {}", path.display());

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: Some(path),
        })
    }

    /// Open a private in-memory database. Contents vanish with the store.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: None,
        })
    }

    /// Re-run schema creation. Existing accounts are left untouched.
    pub fn initialize(&self) -> Result<(), StorageError> {
        let conn = self.conn()?;
        init_schema(&conn)
    }

    /// Path of the database file, `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Number of stored accounts.
    pub fn count(&self) -> Result<u64, StorageError> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM accounts", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }
}

fn init_schema(conn: &Connection) -> Result<(), StorageError> {
    conn.execute(SCHEMA, [])?;
    Ok(())
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == ErrorCode::ConstraintViolation
                && e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn row_to_account(row: &Row<'_>) -> rusqlite::Result<Account> {
    Ok(Account {
        id: row.get(0)?,
        name: row.get(1)?,
        phone: row.get(2)?,
        password_hash: row.get(3)?,
    })
}

impl AccountStore for SqliteAccountStore {
    fn create_account(
        &self,
        name: &str,
        phone: &str,
        password_hash: &str,
    ) -> Result<Account, StorageError> {
        for (column, value) in [
            ("name", name),
            ("phone", phone),
            ("password_hash", password_hash),
        ] {
            if value.is_empty() {
                return Err(StorageError::EmptyField(column));
            }
        }

        let conn = self.conn()?;
        match conn.execute(
            "INSERT INTO accounts (name, phone, password_hash) VALUES (?1, ?2, ?3)",
            params![name, phone, password_hash],
        ) {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(StorageError::DuplicatePhone(phone.to_string()));
            }
            Err(e) => return Err(StorageError::Database(e)),
        }

        let id = conn.last_insert_rowid();
        debug!("Inserted account {}", id);

        Ok(Account {
            id,
            name: name.to_string(),
            phone: phone.to_string(),
            password_hash: password_hash.to_string(),
        })
    }

    fn find_by_phone(&self, phone: &str) -> Result<Option<Account>, StorageError> {
        let conn = self.conn()?;
        let account = conn
            .query_row(
                "SELECT id, name, phone, password_hash FROM accounts WHERE phone = ?1",
                params![phone],
                row_to_account,
            )
            .optional()?;
        Ok(account)
    }

    fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, StorageError> {
        let conn = self.conn()?;
        let account = conn
            .query_row(
                "SELECT id, name, phone, password_hash FROM accounts WHERE id = ?1",
                params![id],
                row_to_account,
            )
            .optional()?;
        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_find() {
        let store = SqliteAccountStore::open_in_memory().unwrap();
        let created = store.create_account("A", "555", "$argon2id$hash").unwrap();

        let by_phone = store.find_by_phone("555").unwrap().unwrap();
        assert_eq!(by_phone, created);

        let by_id = store.find_by_id(created.id).unwrap().unwrap();
        assert_eq!(by_id.phone, "555");
        assert_eq!(by_id.password_hash, "$argon2id$hash");
    }

    #[test]
    fn test_missing_lookups_return_none() {
        let store = SqliteAccountStore::open_in_memory().unwrap();
        assert!(store.find_by_phone("000").unwrap().is_none());
        assert!(store.find_by_id(42).unwrap().is_none());
    }

    #[test]
    fn test_duplicate_phone_rejected() {
        let store = SqliteAccountStore::open_in_memory().unwrap();
        let first = store.create_account("A", "555", "h1").unwrap();

        let err = store.create_account("B", "555", "h2").unwrap_err();
        assert!(matches!(err, StorageError::DuplicatePhone(ref p) if p == "555"));

        // original record untouched
        let stored = store.find_by_phone("555").unwrap().unwrap();
        assert_eq!(stored, first);
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_phone_is_not_normalized() {
        let store = SqliteAccountStore::open_in_memory().unwrap();
        store.create_account("A", "555", "h").unwrap();
        store.create_account("B", " 555", "h").unwrap();
        assert!(store.find_by_phone("555 ").unwrap().is_none());
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_empty_fields_rejected() {
        let store = SqliteAccountStore::open_in_memory().unwrap();
        assert!(matches!(
            store.create_account("", "555", "h"),
            Err(StorageError::EmptyField("name"))
        ));
        assert!(matches!(
            store.create_account("A", "", "h"),
            Err(StorageError::EmptyField("phone"))
        ));
        assert!(matches!(
            store.create_account("A", "555", ""),
            Err(StorageError::EmptyField("password_hash"))
        ));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_ids_increase_in_creation_order() {
        let store = SqliteAccountStore::open_in_memory().unwrap();
        let a = store.create_account("A", "1", "h").unwrap();
        let b = store.create_account("B", "2", "h").unwrap();
        let _ = store.create_account("C", "2", "h").unwrap_err();
        let c = store.create_account("C", "3", "h").unwrap();
        assert!(a.id < b.id);
        assert!(b.id < c.id);
    }

    #[test]
    fn test_schema_init_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("accounts.sqlite");

        let store = SqliteAccountStore::open(&path).unwrap();
        let first = store.create_account("A", "555", "h").unwrap();
        store.initialize().unwrap();
        store.initialize().unwrap();
        drop(store);

        let reopened = SqliteAccountStore::open(&path).unwrap();
        assert_eq!(reopened.path(), Some(path.as_path()));
        assert_eq!(reopened.count().unwrap(), 1);
        assert_eq!(reopened.find_by_phone("555").unwrap().unwrap(), first);

        let second = reopened.create_account("B", "556", "h").unwrap();
        assert!(second.id > first.id);
    }

    #[test]
    fn test_debug_redacts_hash() {
        let account = Account {
            id: 1,
            name: "A".into(),
            phone: "555".into(),
            password_hash: "$argon2id$secret".into(),
        };
        let rendered = format!("{:?}", account);
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("555"));
    }
}
