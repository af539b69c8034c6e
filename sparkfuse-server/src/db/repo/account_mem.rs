use crate::db::error::{StoreError, StoreResult};
use crate::db::repo::account::CredentialStore;
use crate::models::account::Account;
use crate::models::types::AccountId;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

/// Credential store kept entirely in process memory. Used with `store = "memory"` and in tests.
#[derive(Debug)]
pub struct MemoryCredentialStore {
    accounts: RwLock<Vec<Account>>,
    available: AtomicBool,
}

impl Default for MemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(Vec::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Simulate losing the backing store; every call fails with `Unavailable` until restored.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.accounts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.read().is_empty()
    }

    fn check(&self) -> StoreResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("memory store switched off".into()))
        }
    }
}

#[async_trait::async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<Account>> {
        self.check()?;
        Ok(self.accounts.read().iter().find(|a| a.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        self.check()?;
        Ok(self.accounts.read().iter().find(|a| a.email == email).cloned())
    }

    async fn insert(&self, email: &str, username: &str, password_hash: &str) -> StoreResult<Account> {
        self.check()?;

        let mut accounts = self.accounts.write();
        if accounts.iter().any(|a| a.username == username) {
            return Err(StoreError::Duplicate("username"));
        }
        if accounts.iter().any(|a| a.email == email) {
            return Err(StoreError::Duplicate("email"));
        }

        let account = Account {
            id: AccountId::new(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: chrono::Utc::now(),
        };
        accounts.push(account.clone());
        Ok(account)
    }

    async fn update_password(&self, username: &str, password_hash: &str) -> StoreResult<bool> {
        self.check()?;

        let mut accounts = self.accounts.write();
        let Some(account) = accounts.iter_mut().find(|a| a.username == username) else {
            return Ok(false);
        };
        account.password_hash = password_hash.to_string();
        Ok(true)
    }
}
