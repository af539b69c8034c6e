use crate::db::error::StoreResult;
use crate::models::account::Account;

/// Username/email/password-hash records. Uniqueness of both username and email is enforced here,
/// callers only pre-check to produce friendlier prompts.
#[async_trait::async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<Account>>;
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Account>>;
    async fn insert(&self, email: &str, username: &str, password_hash: &str) -> StoreResult<Account>;
    /// Returns false when no account with that username exists.
    async fn update_password(&self, username: &str, password_hash: &str) -> StoreResult<bool>;
}
