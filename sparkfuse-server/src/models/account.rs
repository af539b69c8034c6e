use crate::db::error::{StoreError, StoreResult};
use crate::error::{AppResult, DomainError};
use crate::models::types::AccountId;
use once_cell::sync::Lazy;
use regex::Regex;
use tokio_postgres::Row;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^@]+@[^@]+\.[^@]+").expect("valid email regex"));

#[derive(Debug, Clone)]
pub struct Account {
    pub id: AccountId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Account {
    pub fn try_from_row(row: &Row) -> StoreResult<Self> {
        let decode = |col: &str, e: tokio_postgres::Error| StoreError::Decode(format!("{col}: {e}"));

        Ok(Self {
            id: row.try_get::<_, AccountId>("id").map_err(|e| decode("id", e))?,
            username: row.try_get("username").map_err(|e| decode("username", e))?,
            email: row.try_get("email").map_err(|e| decode("email", e))?,
            password_hash: row.try_get("password_hash").map_err(|e| decode("password_hash", e))?,
            created_at: row.try_get("created_at").map_err(|e| decode("created_at", e))?,
        })
    }

    pub fn validate_email(s: &str) -> AppResult<()> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DomainError::Validation { field: "email", message: "cannot be empty".into() });
        }
        if !EMAIL_RE.is_match(s) {
            return Err(DomainError::Validation {
                field: "email",
                message: "expected something like name@example.org".into(),
            });
        }
        Ok(())
    }
}
