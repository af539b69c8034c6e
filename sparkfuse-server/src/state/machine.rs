use crate::contexts::{Context, ContextArgs, ContextKind, Flow};
use crate::net::line::{ConnResult, Connection};
use crate::state::session::SessionCtx;
use sparkfuse_core::Username;
use tracing::{debug, info, warn};

/// Holds the one active [`Context`] of a session and applies the transitions it returns.
///
/// A switch builds the new context, installs it and awaits its entry action before returning, so the
/// next frame always reaches a context that has already greeted the client.
pub struct SessionContextMachine {
    session: SessionCtx,
    current: Option<Box<dyn Context>>,
}

impl SessionContextMachine {
    pub fn new(session: SessionCtx) -> Self {
        Self { session, current: None }
    }

    pub fn current_kind(&self) -> Option<ContextKind> {
        self.current.as_ref().map(|c| c.kind())
    }

    pub fn username(&self) -> Option<&Username> {
        self.session.username.as_ref()
    }

    pub fn session(&self) -> &SessionCtx {
        &self.session
    }

    pub async fn switch(&mut self, kind: ContextKind, args: ContextArgs, conn: &mut dyn Connection) -> ConnResult<()> {
        debug!(conn = %self.session.handle.id, from = ?self.current_kind(), to = %kind, "context switch");

        let ctx = self.current.insert(kind.build(self.session.clone(), args));
        ctx.on_enter(conn).await
    }

    /// Like [`switch`](Self::switch), by configured name. Unknown names are logged and ignored; the
    /// active context stays and the client is told nothing.
    pub async fn switch_named(&mut self, name: &str, args: ContextArgs, conn: &mut dyn Connection) -> ConnResult<()> {
        match ContextKind::from_name(name) {
            Some(kind) => self.switch(kind, args, conn).await,
            None => {
                warn!(conn = %self.session.handle.id, name, "unknown context name, staying put");
                Ok(())
            }
        }
    }

    /// Hand one frame to the active context, then apply whatever transition it asked for.
    pub async fn dispatch(&mut self, line: &str, conn: &mut dyn Connection) -> ConnResult<()> {
        let Some(ctx) = self.current.as_mut() else {
            warn!(conn = %self.session.handle.id, "frame received with no active context, dropped");
            return Ok(());
        };

        match ctx.handle(line, conn).await? {
            Flow::Stay => Ok(()),
            Flow::Switch(kind, args) => self.switch(kind, args, conn).await,
            Flow::Authenticated(username) => {
                info!(conn = %self.session.handle.id, user = %username, "session authenticated");

                // a session owns at most one registry entry
                if let Some(previous) = self.session.username.replace(username.clone()) {
                    if previous != username {
                        self.session.app.registry.remove(&previous);
                        info!(conn = %self.session.handle.id, user = %previous, "released previous login");
                    }
                }

                let start = self.session.settings().await.settings.start_context.clone();
                self.switch_named(&start, ContextArgs::default(), conn).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::banner::{GREETING_WITH_REGISTRATION, LOBBY_WELCOME};
    use crate::config::{SessionConfig, SettingsProvider};
    use crate::db::repo::MemoryCredentialStore;
    use crate::net::AppCtx;
    use crate::net::scripted::ScriptedConnection;
    use crate::services::AuthService;
    use crate::services::auth::cheap_argon;
    use crate::state::registry::ConnectionRegistry;
    use std::sync::Arc;

    fn machine_with(configure: impl FnOnce(&mut SessionConfig)) -> SessionContextMachine {
        let mut cfg = SessionConfig::default();
        configure(&mut cfg);

        let registry = Arc::new(ConnectionRegistry::new());
        let auth = Arc::new(AuthService::with_argon(Arc::new(MemoryCredentialStore::new()), cheap_argon()));
        let app = Arc::new(AppCtx::new(registry.clone(), auth, Arc::new(SettingsProvider::fixed(cfg))));
        SessionContextMachine::new(SessionCtx::new(app, registry.new_handle("test")))
    }

    fn machine() -> SessionContextMachine {
        machine_with(|_| {})
    }

    #[tokio::test]
    async fn switch_runs_entry_action_before_returning() {
        let mut m = machine();
        let mut conn = ScriptedConnection::default();

        m.switch(ContextKind::Help, ContextArgs::default(), &mut conn).await.unwrap();
        assert_eq!(m.current_kind(), Some(ContextKind::Help));
        assert_eq!(conn.sent, ["Help Menu"]);
    }

    #[tokio::test]
    async fn dispatch_without_context_is_a_noop() {
        let mut m = machine();
        let mut conn = ScriptedConnection::default();

        m.dispatch("help", &mut conn).await.unwrap();
        assert_eq!(m.current_kind(), None);
        assert!(conn.sent.is_empty());
    }

    #[tokio::test]
    async fn dispatch_applies_transitions() {
        let mut m = machine();
        let mut conn = ScriptedConnection::default();
        m.switch(ContextKind::Lobby, ContextArgs::default(), &mut conn).await.unwrap();
        conn.take_sent();

        m.dispatch("MANAGE", &mut conn).await.unwrap();
        assert_eq!(m.current_kind(), Some(ContextKind::Management));
        assert_eq!(conn.take_sent(), ["Account Management"]);

        m.dispatch("messages", &mut conn).await.unwrap();
        m.dispatch("help", &mut conn).await.unwrap();
        m.dispatch("lobby", &mut conn).await.unwrap();
        assert_eq!(m.current_kind(), Some(ContextKind::Lobby));
        assert_eq!(conn.take_sent(), ["Message Menu", "Help Menu", LOBBY_WELCOME]);
    }

    #[tokio::test]
    async fn unrecognized_command_keeps_context() {
        let mut m = machine();
        let mut conn = ScriptedConnection::default();

        for kind in [ContextKind::Lobby, ContextKind::Help, ContextKind::Management, ContextKind::Messages] {
            m.switch(kind, ContextArgs::default(), &mut conn).await.unwrap();
            conn.take_sent();

            m.dispatch("xyzzy", &mut conn).await.unwrap();
            assert_eq!(m.current_kind(), Some(kind));
            let sent = conn.take_sent();
            assert_eq!(sent.len(), 1);
            assert!(sent[0].starts_with("Unrecognized"), "{kind}: {}", sent[0]);
        }
    }

    #[tokio::test]
    async fn commands_lists_vocabulary_with_quit() {
        let mut m = machine();
        let mut conn = ScriptedConnection::default();
        m.switch(ContextKind::Messages, ContextArgs::default(), &mut conn).await.unwrap();
        conn.take_sent();

        m.dispatch("commands", &mut conn).await.unwrap();
        let sent = conn.take_sent();
        assert!(sent[0].starts_with("Available Commands:\n- lobby: "));
        assert!(sent[0].ends_with("- /quit: type /quit to close the connection"));
    }

    #[tokio::test]
    async fn unknown_context_name_is_swallowed() {
        let mut m = machine();
        let mut conn = ScriptedConnection::default();
        m.switch(ContextKind::Help, ContextArgs::default(), &mut conn).await.unwrap();
        conn.take_sent();

        m.switch_named("c_bogus", ContextArgs::default(), &mut conn).await.unwrap();
        assert_eq!(m.current_kind(), Some(ContextKind::Help));
        assert!(conn.sent.is_empty());
    }

    #[tokio::test]
    async fn failed_auth_reenters_auth() {
        let mut m = machine();
        let mut conn = ScriptedConnection::new(["ghost", "pw"]);
        m.switch(ContextKind::Auth, ContextArgs::default(), &mut conn).await.unwrap();

        m.dispatch("login", &mut conn).await.unwrap();
        assert_eq!(m.current_kind(), Some(ContextKind::Auth));
        assert_eq!(m.username(), None);
        assert_eq!(conn.sent.last().map(String::as_str), Some(GREETING_WITH_REGISTRATION));
    }

    #[tokio::test]
    async fn login_moves_to_start_context() {
        let mut m = machine_with(|c| c.settings.start_context = "c_help".into());
        m.session().app.auth.create_account("a@example.org", "alice", "pw").await.unwrap();

        let mut conn = ScriptedConnection::new(["alice", "pw"]);
        m.switch(ContextKind::Auth, ContextArgs::default(), &mut conn).await.unwrap();
        m.dispatch("login", &mut conn).await.unwrap();

        assert_eq!(m.username().map(Username::as_str), Some("alice"));
        assert_eq!(m.current_kind(), Some(ContextKind::Help));
        assert_eq!(conn.sent.last().map(String::as_str), Some("Help Menu"));
    }

    #[tokio::test]
    async fn bad_start_context_leaves_session_in_auth() {
        let mut m = machine_with(|c| c.settings.start_context = "nowhere".into());
        m.session().app.auth.create_account("a@example.org", "alice", "pw").await.unwrap();

        let mut conn = ScriptedConnection::new(["alice", "pw"]);
        m.switch(ContextKind::Auth, ContextArgs::default(), &mut conn).await.unwrap();
        m.dispatch("login", &mut conn).await.unwrap();

        // logged in, but the unknown name means no switch happened
        assert!(m.username().is_some());
        assert_eq!(m.current_kind(), Some(ContextKind::Auth));
    }

    #[tokio::test]
    async fn relogin_in_same_session_releases_previous_name() {
        let mut m = machine_with(|c| c.settings.start_context = "nowhere".into());
        let auth = m.session().app.auth.clone();
        auth.create_account("a@example.org", "alice", "pw").await.unwrap();
        auth.create_account("b@example.org", "bob", "pw").await.unwrap();

        let mut conn = ScriptedConnection::new(["alice", "pw", "bob", "pw"]);
        m.switch(ContextKind::Auth, ContextArgs::default(), &mut conn).await.unwrap();
        m.dispatch("login", &mut conn).await.unwrap();
        m.dispatch("login", &mut conn).await.unwrap();

        let registry = &m.session().app.registry;
        assert_eq!(m.username().map(Username::as_str), Some("bob"));
        assert_eq!(registry.list(), vec![Username::parse("bob").unwrap()]);
    }
}
