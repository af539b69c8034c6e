use crate::db::Db;
use crate::db::error::{StoreError, StoreResult};
use crate::db::repo::account::CredentialStore;
use crate::models::account::Account;
use crate::models::types::AccountId;
use std::sync::Arc;

pub struct PgCredentialStore {
    db: Arc<Db>,
}

impl PgCredentialStore {
    pub fn new(db: Arc<Db>) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<Account>> {
        let client = self.db.get_client().await?;

        let stmt = client
            .prepare_cached(
                r#"
            SELECT id, username, email, password_hash, created_at
            FROM accounts
            WHERE username = $1
            "#,
            )
            .await?;

        let row_opt = client.query_opt(&stmt, &[&username]).await?;
        row_opt.as_ref().map(Account::try_from_row).transpose()
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        let client = self.db.get_client().await?;

        let stmt = client
            .prepare_cached(
                r#"
            SELECT id, username, email, password_hash, created_at
            FROM accounts
            WHERE email = $1
            "#,
            )
            .await?;

        let row_opt = client.query_opt(&stmt, &[&email]).await?;
        row_opt.as_ref().map(Account::try_from_row).transpose()
    }

    async fn insert(&self, email: &str, username: &str, password_hash: &str) -> StoreResult<Account> {
        let client = self.db.get_client().await?;

        let stmt = client
            .prepare_cached(
                r#"
            INSERT INTO accounts (id, username, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, password_hash, created_at
            "#,
            )
            .await?;

        let row = client
            .query_one(&stmt, &[&AccountId::new(), &username, &email, &password_hash])
            .await
            .map_err(StoreError::from_pg)?;

        Account::try_from_row(&row)
    }

    async fn update_password(&self, username: &str, password_hash: &str) -> StoreResult<bool> {
        let client = self.db.get_client().await?;

        let stmt = client
            .prepare_cached("UPDATE accounts SET password_hash = $2 WHERE username = $1")
            .await?;
        let n = client.execute(&stmt, &[&username, &password_hash]).await?;

        Ok(n == 1)
    }
}
