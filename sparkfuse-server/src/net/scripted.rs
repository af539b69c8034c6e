use crate::net::line::{ConnError, ConnResult, Connection};
use async_trait::async_trait;
use std::collections::VecDeque;

/// In-memory connection fed from a fixed script; `recv` past the end reports `Closed`.
#[derive(Debug, Default)]
pub(crate) struct ScriptedConnection {
    inbound: VecDeque<String>,
    pub sent: Vec<String>,
}

impl ScriptedConnection {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { inbound: lines.into_iter().map(Into::into).collect(), sent: Vec::new() }
    }

    pub fn take_sent(&mut self) -> Vec<String> {
        std::mem::take(&mut self.sent)
    }

    pub fn saw(&self, needle: &str) -> bool {
        self.sent.iter().any(|s| s.contains(needle))
    }
}

#[async_trait]
impl Connection for ScriptedConnection {
    async fn send(&mut self, text: &str) -> ConnResult<()> {
        self.sent.push(text.to_string());
        Ok(())
    }

    async fn recv(&mut self) -> ConnResult<String> {
        self.inbound.pop_front().ok_or(ConnError::Closed)
    }
}
