use super::{CommandInfo, Context, ContextArgs, ContextKind, Flow, QUIT_COMMAND, send_commands, send_unrecognized};
use crate::input::parser::parse_command;
use crate::net::line::{ConnResult, Connection};
use crate::prelogin::STORE_FAILURE;
use crate::services::AuthService;
use crate::state::session::SessionCtx;
use async_trait::async_trait;
use sparkfuse_core::Username;
use tracing::{error, info, warn};

const COMMANDS: &[CommandInfo] = &[
    ("help", "Open the help menu"),
    ("lobby", "Return to the lobby"),
    ("messages", "Open the message menu"),
    ("reset", "Change your password"),
    ("commands", "List available commands"),
    QUIT_COMMAND,
];

const UNRECOGNIZED: &str = "Unrecognized Management command. Type 'help', 'commands', 'lobby', 'reset', or 'messages' for more information.";

pub const PROMPT_CURRENT: &str = "Enter your current password:";
pub const CURRENT_MISMATCH: &str = "Incorrect current password.";
pub const PROMPT_NEW: &str = "Enter your new password:";
pub const PROMPT_CONFIRM: &str = "Confirm your new password:";
pub const CONFIRM_MISMATCH: &str = "Passwords do not match.";
pub const RESET_OK: &str = "Password successfully changed.";
pub const RESET_FAILED: &str = "Failed to change the password.";

pub struct ManagementContext {
    session: SessionCtx,
}

impl ManagementContext {
    pub fn new(session: SessionCtx, _args: ContextArgs) -> Self {
        Self { session }
    }

    async fn reset_password(&self, conn: &mut dyn Connection) -> ConnResult<()> {
        let Some(username) = self.session.username.as_ref() else {
            warn!(conn = %self.session.handle.id, "password reset without a logged in user");
            return conn.send(RESET_FAILED).await;
        };
        reset_password(&self.session.app.auth, username, conn).await
    }
}

/// Current password, new password, confirmation. The stored hash is touched only after all three
/// check out, and then in one store update.
pub async fn reset_password(auth: &AuthService, username: &Username, conn: &mut dyn Connection) -> ConnResult<()> {
    conn.send(PROMPT_CURRENT).await?;
    let current = conn.recv().await?;

    match auth.verify(username.as_str(), &current).await {
        Ok(true) => {}
        Ok(false) => return conn.send(CURRENT_MISMATCH).await,
        Err(e) => {
            error!(error = %e, user = %username, "password check failed");
            return conn.send(STORE_FAILURE).await;
        }
    }

    conn.send(PROMPT_NEW).await?;
    let new_password = conn.recv().await?;
    conn.send(PROMPT_CONFIRM).await?;
    let confirmation = conn.recv().await?;

    if new_password != confirmation {
        return conn.send(CONFIRM_MISMATCH).await;
    }

    match auth.change_password(username.as_str(), &new_password).await {
        Ok(true) => {
            info!(user = %username, "password changed");
            conn.send(RESET_OK).await
        }
        Ok(false) => {
            warn!(user = %username, "password change matched no account");
            conn.send(RESET_FAILED).await
        }
        Err(e) => {
            error!(error = %e, user = %username, "password change failed");
            conn.send(RESET_FAILED).await
        }
    }
}

#[async_trait]
impl Context for ManagementContext {
    fn kind(&self) -> ContextKind {
        ContextKind::Management
    }

    fn commands(&self) -> &'static [CommandInfo] {
        COMMANDS
    }

    async fn on_enter(&mut self, conn: &mut dyn Connection) -> ConnResult<()> {
        conn.send("Account Management").await
    }

    async fn handle(&mut self, line: &str, conn: &mut dyn Connection) -> ConnResult<Flow> {
        match parse_command(line).verb.as_str() {
            "help" => Ok(Flow::to(ContextKind::Help)),
            "lobby" => Ok(Flow::to(ContextKind::Lobby)),
            "messages" => Ok(Flow::to(ContextKind::Messages)),
            "commands" => send_commands(conn, self.commands()).await,
            "reset" => {
                self.reset_password(conn).await?;
                Ok(Flow::Stay)
            }
            _ => send_unrecognized(conn, UNRECOGNIZED).await,
        }
    }
}
