//! Account service
//!
//! Business rules over the account store: validation, password hashing and
//! verification, and shaping results into redacted projections.

use log::{debug, info};
use std::sync::Arc;

use crate::account::password::CredentialHasher;
use crate::account::requests::{LoginRequest, RegisterRequest};
use crate::account::results::{Profile, Registered};
use crate::account::validator::validate_registration;
use crate::error::AccountError;
use crate::storage::{AccountId, AccountStore};

/// Stateless account operations over a shared store.
///
/// Hashing and store access run on the blocking pool, so a slow hash or a
/// busy database only holds up the request that caused it.
pub struct AccountService<S: AccountStore> {
    store: Arc<S>,
    hasher: CredentialHasher,
    max_field_length: usize,
}

impl<S: AccountStore> AccountService<S> {
    pub fn new(store: S, hasher: CredentialHasher, max_field_length: usize) -> Self {
        Self {
            store: Arc::new(store),
            hasher,
            max_field_length,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create an account and return its id.
    pub async fn register(&self, request: RegisterRequest) -> Result<Registered, AccountError> {
        validate_registration(&request, self.max_field_length)?;

        let RegisterRequest {
            name,
            phone,
            password,
        } = request;
        let hasher = self.hasher.clone();
        let store = Arc::clone(&self.store);

        let account = run_blocking(move || {
            let password_hash = hasher.hash(&password)?;
            store
                .create_account(&name, &phone, &password_hash)
                .map_err(AccountError::from)
        })
        .await?;

        info!("Registered account {}", account.id);
        Ok(Registered { id: account.id })
    }

    /// Check a phone/password pair and return the matching profile.
    ///
    /// An unknown phone and a wrong password fail differently, which reveals
    /// whether a phone is registered.
    pub async fn authenticate(&self, request: LoginRequest) -> Result<Profile, AccountError> {
        let LoginRequest { phone, password } = request;
        let hasher = self.hasher.clone();
        let store = Arc::clone(&self.store);

        let profile = run_blocking(move || {
            let account = store
                .find_by_phone(&phone)?
                .ok_or(AccountError::InvalidPhone)?;

            if hasher.verify(&password, &account.password_hash)? {
                Ok(Profile::from(account))
            } else {
                Err(AccountError::InvalidPassword)
            }
        })
        .await?;

        debug!("Authenticated account {}", profile.id);
        Ok(profile)
    }

    pub async fn get_profile(&self, id: AccountId) -> Result<Profile, AccountError> {
        let store = Arc::clone(&self.store);

        run_blocking(move || {
            store
                .find_by_id(id)?
                .map(Profile::from)
                .ok_or(AccountError::NotFound(id))
        })
        .await
    }
}

async fn run_blocking<T, F>(task: F) -> Result<T, AccountError>
where
    F: FnOnce() -> Result<T, AccountError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| AccountError::Internal(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteAccountStore;

    fn service() -> AccountService<SqliteAccountStore> {
        let store = SqliteAccountStore::open_in_memory().unwrap();
        let hasher = CredentialHasher::new(1024, 1, 1).unwrap();
        AccountService::new(store, hasher, 256)
    }

    #[tokio::test]
    async fn test_register_then_authenticate() {
        let service = service();
        let registered = service
            .register(RegisterRequest::new("A", "555", "p1"))
            .await
            .unwrap();

        let profile = service
            .authenticate(LoginRequest::new("555", "p1"))
            .await
            .unwrap();

        assert_eq!(
            profile,
            Profile {
                id: registered.id,
                name: "A".into(),
                phone: "555".into(),
            }
        );
    }

    #[tokio::test]
    async fn test_wrong_credentials_rejected() {
        let service = service();
        service
            .register(RegisterRequest::new("A", "555", "p1"))
            .await
            .unwrap();

        let wrong_password = service
            .authenticate(LoginRequest::new("555", "wrong"))
            .await;
        assert!(matches!(wrong_password, Err(AccountError::InvalidPassword)));

        let wrong_phone = service.authenticate(LoginRequest::new("000", "p1")).await;
        assert!(matches!(wrong_phone, Err(AccountError::InvalidPhone)));
    }

    #[tokio::test]
    async fn test_validation_failures_create_nothing() {
        let service = service();
        let requests = [
            RegisterRequest::new("", "555", "p1"),
            RegisterRequest::new("A", "", "p1"),
            RegisterRequest::new("A", "555", ""),
        ];

        for request in requests {
            let err = service.register(request).await.unwrap_err();
            assert!(err.is_validation(), "unexpected error: {:?}", err);
        }

        assert_eq!(service.store().count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_phone_rejected() {
        let service = service();
        service
            .register(RegisterRequest::new("A", "555", "p1"))
            .await
            .unwrap();

        let err = service
            .register(RegisterRequest::new("B", "555", "p2"))
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::DuplicatePhone(_)));

        // first registration still owns the phone
        let profile = service
            .authenticate(LoginRequest::new("555", "p1"))
            .await
            .unwrap();
        assert_eq!(profile.name, "A");
    }

    #[tokio::test]
    async fn test_hashes_are_salted_and_never_plaintext() {
        let service = service();
        service
            .register(RegisterRequest::new("A", "555", "shared-secret"))
            .await
            .unwrap();
        service
            .register(RegisterRequest::new("B", "556", "shared-secret"))
            .await
            .unwrap();

        let a = service.store().find_by_phone("555").unwrap().unwrap();
        let b = service.store().find_by_phone("556").unwrap().unwrap();
        assert_ne!(a.password_hash, b.password_hash);
        assert!(!a.password_hash.contains("shared-secret"));
        assert!(!b.password_hash.contains("shared-secret"));
    }

    #[tokio::test]
    async fn test_profile_lookup() {
        let service = service();
        let registered = service
            .register(RegisterRequest::new("A", "555", "p1"))
            .await
            .unwrap();

        let profile = service.get_profile(registered.id).await.unwrap();
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["phone"], "555");
        assert!(json.get("password").is_none());
        assert!(json.get("password_hash").is_none());

        let missing = service.get_profile(registered.id + 100).await;
        assert!(matches!(missing, Err(AccountError::NotFound(_))));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_registrations_single_winner() {
        let service = Arc::new(service());
        let mut handles = Vec::new();

        for i in 0..8 {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                service
                    .register(RegisterRequest::new(&format!("user{}", i), "555", "p1"))
                    .await
            }));
        }

        let mut successes = 0;
        let mut duplicates = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(AccountError::DuplicatePhone(_)) => duplicates += 1,
                Err(e) => panic!("unexpected error: {:?}", e),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(duplicates, 7);
        assert_eq!(service.store().count().unwrap(), 1);
    }
}
