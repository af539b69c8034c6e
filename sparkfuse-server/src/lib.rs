pub mod banner;
pub mod client;
pub mod config;
pub mod contexts;
pub mod db;
pub mod error;
pub mod input;
pub mod models;
pub mod net;
pub mod prelogin;
pub mod services;
pub mod state;
pub mod util;

// Convenient re-exports (so call sites can do `sparkfuse_server::ConnectionRegistry`, etc.)
pub use config::{Config, SessionConfig, SettingsProvider};
pub use net::AppCtx;
pub use net::connection::handle_connection;
pub use net::line::{ConnError, ConnResult, Connection, LineConnection};
pub use state::{machine::SessionContextMachine, registry::ConnectionRegistry, session::SessionCtx};
