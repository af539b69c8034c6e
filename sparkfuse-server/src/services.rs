pub mod auth;

pub use auth::{AuthService, GENERATED_PASSWORD_LEN};
