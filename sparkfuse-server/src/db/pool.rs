use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod, Runtime};
use std::str::FromStr;
use tokio_postgres::NoTls;

use super::Db;
use super::error::StoreResult;

/// Upper bound on concurrent credential queries; logins and registrations are short-lived.
const MAX_CONNECTIONS: usize = 16;

impl Db {
    /// Build the pool from a `postgres://` URL. Nothing connects until the first query.
    pub fn new(url: &str) -> StoreResult<Self> {
        let pg = tokio_postgres::Config::from_str(url)?;
        let manager = Manager::from_config(pg, NoTls, ManagerConfig { recycling_method: RecyclingMethod::Fast });

        let pool = Pool::builder(manager).max_size(MAX_CONNECTIONS).runtime(Runtime::Tokio1).build()?;
        Ok(Self { pool })
    }
}
