use crate::net::line::{ConnResult, Connection};
use crate::state::session::SessionCtx;
use async_trait::async_trait;
use sparkfuse_core::Username;
use std::collections::BTreeMap;
use std::fmt;

mod auth;
mod help;
mod lobby;
mod management;
mod messages;

pub use auth::AuthContext;
pub use help::HelpContext;
pub use lobby::LobbyContext;
pub use management::ManagementContext;
pub use messages::MessagesContext;

/// Vocabulary entry: command word and its one-line description.
pub type CommandInfo = (&'static str, &'static str);

/// Listed in every vocabulary; the session loop acts on it, never a context.
pub const QUIT_COMMAND: CommandInfo = ("/quit", "type /quit to close the connection");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextKind {
    Auth,
    Lobby,
    Help,
    Management,
    Messages,
}

type Constructor = fn(SessionCtx, ContextArgs) -> Box<dyn Context>;

fn boxed<C: Context + 'static>(ctx: C) -> Box<dyn Context> {
    Box::new(ctx)
}

impl ContextKind {
    pub const ALL: [ContextKind; 5] = [
        ContextKind::Auth,
        ContextKind::Lobby,
        ContextKind::Help,
        ContextKind::Management,
        ContextKind::Messages,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ContextKind::Auth => "auth",
            ContextKind::Lobby => "lobby",
            ContextKind::Help => "help",
            ContextKind::Management => "management",
            ContextKind::Messages => "messages",
        }
    }

    /// Resolve a context name as written in config files. Accepts the bare name (`lobby`) and the
    /// module style (`c_lobby`), case-insensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        let name = name.strip_prefix("c_").unwrap_or(&name);
        match name {
            "auth" | "server_auth" => Some(ContextKind::Auth),
            "lobby" => Some(ContextKind::Lobby),
            "help" => Some(ContextKind::Help),
            "management" | "manage" => Some(ContextKind::Management),
            "messages" => Some(ContextKind::Messages),
            _ => None,
        }
    }

    fn constructor(self) -> Constructor {
        match self {
            ContextKind::Auth => |s, a| boxed(AuthContext::new(s, a)),
            ContextKind::Lobby => |s, a| boxed(LobbyContext::new(s, a)),
            ContextKind::Help => |s, a| boxed(HelpContext::new(s, a)),
            ContextKind::Management => |s, a| boxed(ManagementContext::new(s, a)),
            ContextKind::Messages => |s, a| boxed(MessagesContext::new(s, a)),
        }
    }

    pub fn build(self, session: SessionCtx, args: ContextArgs) -> Box<dyn Context> {
        (self.constructor())(session, args)
    }
}

impl fmt::Display for ContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Values explicitly carried across a context switch. Nothing else survives one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextArgs(BTreeMap<String, String>);

impl ContextArgs {
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.0.insert(key.into(), value.to_string());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// What the session machine should do after a command was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Stay,
    Switch(ContextKind, ContextArgs),
    Authenticated(Username),
}

impl Flow {
    pub fn to(kind: ContextKind) -> Self {
        Flow::Switch(kind, ContextArgs::default())
    }
}

/// One interaction mode with its own command vocabulary.
#[async_trait]
pub trait Context: Send {
    fn kind(&self) -> ContextKind;

    fn commands(&self) -> &'static [CommandInfo];

    /// Runs once when the context becomes active, before any command reaches it.
    async fn on_enter(&mut self, _conn: &mut dyn Connection) -> ConnResult<()> {
        Ok(())
    }

    async fn handle(&mut self, line: &str, conn: &mut dyn Connection) -> ConnResult<Flow>;
}

pub fn commands_text(commands: &[CommandInfo]) -> String {
    let mut out = String::from("Available Commands:");
    for (cmd, description) in commands {
        out.push_str(&format!("\n- {cmd}: {description}"));
    }
    out
}

pub(crate) async fn send_commands(conn: &mut dyn Connection, commands: &[CommandInfo]) -> ConnResult<Flow> {
    conn.send(&commands_text(commands)).await?;
    Ok(Flow::Stay)
}

pub(crate) async fn send_unrecognized(conn: &mut dyn Connection, message: &str) -> ConnResult<Flow> {
    conn.send(message).await?;
    Ok(Flow::Stay)
}
