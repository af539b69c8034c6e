pub mod account;
pub mod account_db;
pub mod account_mem;

pub use account::CredentialStore;
pub use account_db::PgCredentialStore;
pub use account_mem::MemoryCredentialStore;
