use crate::banner::BANNER;
use crate::contexts::{ContextArgs, ContextKind};
use crate::input::parser::parse_command;
use crate::net::AppCtx;
use crate::net::line::{ConnError, ConnResult, Connection};
use crate::state::machine::SessionContextMachine;
use crate::state::session::SessionCtx;
use std::sync::Arc;
use tracing::{debug, info};

pub const QUIT: &str = "/quit";
pub const GOODBYE: &str = "Goodbye!";

/// Runs one session from banner to disconnect.
///
/// Whatever ends the session (EOF, `/quit`, an I/O error) the username it claimed is released from
/// the registry before this returns. A remote close is not an error.
pub async fn handle_connection<C: Connection>(mut conn: C, app: Arc<AppCtx>, peer: String) -> ConnResult<()> {
    let handle = app.registry.new_handle(peer);
    let id = handle.id;
    info!(conn = %id, peer = %handle.peer, "connection opened");

    let mut machine = SessionContextMachine::new(SessionCtx::new(app.clone(), handle));
    let result = run_session(&mut conn, &mut machine).await;

    if let Some(username) = machine.username() {
        app.registry.remove(username);
        info!(conn = %id, user = %username, "user went offline");
    }

    match result {
        Ok(()) | Err(ConnError::Closed) => {
            info!(conn = %id, "connection closed");
            Ok(())
        }
        Err(e) => {
            info!(conn = %id, error = %e, "connection dropped");
            Err(e)
        }
    }
}

async fn run_session<C: Connection>(conn: &mut C, machine: &mut SessionContextMachine) -> ConnResult<()> {
    conn.send(BANNER).await?;
    machine.switch(ContextKind::Auth, ContextArgs::default(), conn).await?;

    loop {
        let line = conn.recv().await?;
        debug!(conn = %machine.session().handle.id, %line, "received line");

        if parse_command(&line).verb == QUIT {
            conn.send(GOODBYE).await?;
            return Ok(());
        }

        machine.dispatch(&line, conn).await?;
    }
}
