use crate::db::repo::CredentialStore;
use crate::error::AppResult;
use crate::models::account::Account;
use argon2::Argon2;
use password_hash::rand_core::OsRng;
use password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use rand::Rng;
use rand::distr::Alphanumeric;
use std::sync::Arc;

pub const GENERATED_PASSWORD_LEN: usize = 12;

/// Password hashing and credential checks on top of a [`CredentialStore`].
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    argon: Argon2<'static>,
}

impl AuthService {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self::with_argon(store, Argon2::default())
    }

    pub fn with_argon(store: Arc<dyn CredentialStore>, argon: Argon2<'static>) -> Self {
        Self { store, argon }
    }

    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Ok(self.argon.hash_password(password.as_bytes(), &salt)?.to_string())
    }

    /// True only when the account exists and the password matches its stored hash.
    pub async fn verify(&self, username: &str, password: &str) -> AppResult<bool> {
        let Some(account) = self.store.find_by_username(username).await? else {
            return Ok(false);
        };

        let parsed = PasswordHash::new(&account.password_hash)?;
        match self.argon.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn email_taken(&self, email: &str) -> AppResult<bool> {
        Ok(self.store.find_by_email(email).await?.is_some())
    }

    pub async fn username_taken(&self, username: &str) -> AppResult<bool> {
        Ok(self.store.find_by_username(username).await?.is_some())
    }

    pub async fn create_account(&self, email: &str, username: &str, password: &str) -> AppResult<Account> {
        let hash = self.hash_password(password)?;
        Ok(self.store.insert(email, username, &hash).await?)
    }

    /// Hash first, then a single store update; the old hash stays if anything fails.
    pub async fn change_password(&self, username: &str, new_password: &str) -> AppResult<bool> {
        let hash = self.hash_password(new_password)?;
        Ok(self.store.update_password(username, &hash).await?)
    }

    pub fn generate_password() -> String {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(GENERATED_PASSWORD_LEN)
            .map(char::from)
            .collect()
    }
}

#[cfg(test)]
pub(crate) fn cheap_argon() -> Argon2<'static> {
    use argon2::{Algorithm, Params, Version};

    let params = Params::new(Params::MIN_M_COST, 1, 1, None).expect("valid argon2 params");
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
}
