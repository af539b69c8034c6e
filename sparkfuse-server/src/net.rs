use crate::config::SettingsProvider;
use crate::services::AuthService;
use crate::state::registry::ConnectionRegistry;
use std::sync::Arc;

pub mod connection;
pub mod line;
pub mod server;
pub mod tls;

#[cfg(test)]
pub(crate) mod scripted;

/// Process-wide state handed to every session.
pub struct AppCtx {
    pub registry: Arc<ConnectionRegistry>,
    pub auth: Arc<AuthService>,
    pub settings: Arc<SettingsProvider>,
}

impl AppCtx {
    pub fn new(registry: Arc<ConnectionRegistry>, auth: Arc<AuthService>, settings: Arc<SettingsProvider>) -> Self {
        Self { registry, auth, settings }
    }
}
