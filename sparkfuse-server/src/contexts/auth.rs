use super::{CommandInfo, Context, ContextArgs, ContextKind, Flow, QUIT_COMMAND};
use crate::net::line::{ConnResult, Connection};
use crate::prelogin::{AuthOutcome, AuthenticationGate};
use crate::state::session::SessionCtx;
use async_trait::async_trait;
use tracing::debug;

const COMMANDS: &[CommandInfo] = &[
    ("login", "Log in with an existing account"),
    ("register", "Create a new account"),
    QUIT_COMMAND,
];

/// Unauthenticated sessions live here. Each attempt re-enters the context so the greeting repeats.
pub struct AuthContext {
    session: SessionCtx,
    attempt: u32,
}

impl AuthContext {
    pub fn new(session: SessionCtx, args: ContextArgs) -> Self {
        let attempt = args.get("attempt").and_then(|a| a.parse().ok()).unwrap_or(1);
        Self { session, attempt }
    }
}

#[async_trait]
impl Context for AuthContext {
    fn kind(&self) -> ContextKind {
        ContextKind::Auth
    }

    fn commands(&self) -> &'static [CommandInfo] {
        COMMANDS
    }

    async fn on_enter(&mut self, conn: &mut dyn Connection) -> ConnResult<()> {
        AuthenticationGate::new(&self.session).await.greet(conn).await
    }

    async fn handle(&mut self, line: &str, conn: &mut dyn Connection) -> ConnResult<Flow> {
        let gate = AuthenticationGate::new(&self.session).await;

        match gate.attempt(line, conn).await? {
            AuthOutcome::Authenticated(username) => Ok(Flow::Authenticated(username)),
            AuthOutcome::Unauthenticated => {
                debug!(conn = %self.session.handle.id, attempt = self.attempt, "authentication attempt ended");
                let args = ContextArgs::default().with("attempt", self.attempt + 1);
                Ok(Flow::Switch(ContextKind::Auth, args))
            }
        }
    }
}
