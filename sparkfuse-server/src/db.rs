//! Postgres plumbing behind [`repo::PgCredentialStore`].

use deadpool_postgres::{Client, Pool};

use crate::db::error::StoreResult;

pub mod error;
pub mod repo;
mod migrations;
mod pool;

/// Pooled connection to the accounts database.
#[derive(Clone, Debug)]
pub struct Db {
    pool: Pool,
}

impl Db {
    /// A pooled client; pool exhaustion and connect failures surface as [`error::StoreError::Pool`].
    pub async fn get_client(&self) -> StoreResult<Client> {
        Ok(self.pool.get().await?)
    }
}
