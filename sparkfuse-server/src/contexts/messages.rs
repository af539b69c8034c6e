use super::{CommandInfo, Context, ContextArgs, ContextKind, Flow, QUIT_COMMAND, send_commands, send_unrecognized};
use crate::input::parser::parse_command;
use crate::net::line::{ConnResult, Connection};
use crate::state::session::SessionCtx;
use async_trait::async_trait;

const COMMANDS: &[CommandInfo] = &[
    ("lobby", "Return to the lobby"),
    ("manage", "Manage your account"),
    ("help", "Open the help menu"),
    ("commands", "List available commands"),
    QUIT_COMMAND,
];

const UNRECOGNIZED: &str =
    "Unrecognized Messages command. Type 'lobby', 'commands', 'manage', or 'help' for more information.";

pub struct MessagesContext;

impl MessagesContext {
    pub fn new(_session: SessionCtx, _args: ContextArgs) -> Self {
        Self
    }
}

#[async_trait]
impl Context for MessagesContext {
    fn kind(&self) -> ContextKind {
        ContextKind::Messages
    }

    fn commands(&self) -> &'static [CommandInfo] {
        COMMANDS
    }

    async fn on_enter(&mut self, conn: &mut dyn Connection) -> ConnResult<()> {
        conn.send("Message Menu").await
    }

    async fn handle(&mut self, line: &str, conn: &mut dyn Connection) -> ConnResult<Flow> {
        match parse_command(line).verb.as_str() {
            "lobby" => Ok(Flow::to(ContextKind::Lobby)),
            "manage" => Ok(Flow::to(ContextKind::Management)),
            "help" => Ok(Flow::to(ContextKind::Help)),
            "commands" => send_commands(conn, self.commands()).await,
            _ => send_unrecognized(conn, UNRECOGNIZED).await,
        }
    }
}
