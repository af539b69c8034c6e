use super::{CommandInfo, Context, ContextArgs, ContextKind, Flow, QUIT_COMMAND, send_commands, send_unrecognized};
use crate::banner::{LOBBY_WELCOME, MOTD_MISSING};
use crate::config::SessionConfig;
use crate::input::parser::parse_command;
use crate::net::line::{ConnResult, Connection};
use crate::state::session::SessionCtx;
use crate::util::text::{WRAP_WIDTH, wrap_paragraphs};
use async_trait::async_trait;
use tracing::warn;

const COMMANDS: &[CommandInfo] = &[
    ("help", "Open the help menu"),
    ("who", "List connected users"),
    ("manage", "Manage your account"),
    ("messages", "Open the message menu"),
    ("refresh", "Show the lobby welcome again"),
    ("commands", "List available commands"),
    QUIT_COMMAND,
];

const UNRECOGNIZED: &str =
    "Unrecognized Lobby command. Type 'help', 'commands', 'manage', or 'messages' for more information.";

pub struct LobbyContext {
    session: SessionCtx,
}

impl LobbyContext {
    pub fn new(session: SessionCtx, _args: ContextArgs) -> Self {
        Self { session }
    }
}

/// Lobby entry text: the wrapped MOTD file when enabled, otherwise the plain welcome.
pub async fn welcome_text(config: &SessionConfig) -> String {
    if !config.settings.motd {
        return LOBBY_WELCOME.to_string();
    }

    let Some(path) = &config.messages.motd_file else {
        warn!("motd enabled but no motd_file configured");
        return MOTD_MISSING.to_string();
    };

    match tokio::fs::read_to_string(path).await {
        Ok(text) => wrap_paragraphs(text.trim(), WRAP_WIDTH),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "motd file unreadable");
            MOTD_MISSING.to_string()
        }
    }
}

/// `who` output; names in registry order.
pub fn who_text<I, S>(names: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::from("Connected users:");
    for name in names {
        out.push('\n');
        out.push_str(name.as_ref());
    }
    out
}

#[async_trait]
impl Context for LobbyContext {
    fn kind(&self) -> ContextKind {
        ContextKind::Lobby
    }

    fn commands(&self) -> &'static [CommandInfo] {
        COMMANDS
    }

    async fn on_enter(&mut self, conn: &mut dyn Connection) -> ConnResult<()> {
        let text = welcome_text(&*self.session.settings().await).await;
        conn.send(&text).await
    }

    async fn handle(&mut self, line: &str, conn: &mut dyn Connection) -> ConnResult<Flow> {
        let intent = parse_command(line);

        match intent.verb.as_str() {
            "help" => Ok(Flow::to(ContextKind::Help)),
            "manage" => Ok(Flow::to(ContextKind::Management)),
            "messages" => Ok(Flow::to(ContextKind::Messages)),
            "refresh" => Ok(Flow::to(ContextKind::Lobby)),
            "commands" => send_commands(conn, self.commands()).await,
            "who" => {
                let names = self.session.app.registry.list();
                conn.send(&who_text(names)).await?;
                Ok(Flow::Stay)
            }
            _ => send_unrecognized(conn, UNRECOGNIZED).await,
        }
    }
}
