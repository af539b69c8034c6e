use crate::config::SessionConfig;
use crate::net::AppCtx;
use crate::state::registry::ConnectionHandle;
use sparkfuse_core::Username;
use std::sync::Arc;

/// Fields every context of one session shares. Cloned into each freshly built context.
#[derive(Clone)]
pub struct SessionCtx {
    /// Process-wide services
    pub app: Arc<AppCtx>,
    /// This session's connection
    pub handle: ConnectionHandle,
    /// Set once the login succeeded
    pub username: Option<Username>,
}

impl SessionCtx {
    pub fn new(app: Arc<AppCtx>, handle: ConnectionHandle) -> Self {
        Self { app, handle, username: None }
    }

    /// Current settings snapshot, re-read or not depending on the reload policy.
    pub async fn settings(&self) -> Arc<SessionConfig> {
        self.app.settings.current().await
    }
}
