use crate::models::types::ConnId;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use sparkfuse_core::Username;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

/// Identifies one live connection. Cheap to clone; the connection itself stays with its session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionHandle {
    pub id: ConnId,
    pub peer: String,
    pub connected_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("{0} is already connected")]
    AlreadyConnected(Username),
}

/// Process-wide presence table: authenticated username -> live connection.
///
/// A username appears at most once. The first session to claim a name keeps it until that session
/// removes it; a second login for the same name is refused rather than replacing the entry.
#[derive(Debug)]
pub struct ConnectionRegistry {
    online: RwLock<BTreeMap<Username, ConnectionHandle>>,
    next_id: AtomicU64,
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            online: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn new_handle(&self, peer: impl Into<String>) -> ConnectionHandle {
        ConnectionHandle {
            id: ConnId(self.next_id.fetch_add(1, Ordering::Relaxed)),
            peer: peer.into(),
            connected_at: Utc::now(),
        }
    }

    pub fn add(&self, name: &Username, handle: ConnectionHandle) -> Result<(), RegistryError> {
        let mut g = self.online.write();
        if g.contains_key(name) {
            return Err(RegistryError::AlreadyConnected(name.clone()));
        }
        g.insert(name.clone(), handle);
        Ok(())
    }

    /// Idempotent; returns the handle that was removed, if any.
    pub fn remove(&self, name: &Username) -> Option<ConnectionHandle> {
        self.online.write().remove(name)
    }

    pub fn get(&self, name: &Username) -> Option<ConnectionHandle> {
        self.online.read().get(name).cloned()
    }

    pub fn list(&self) -> Vec<Username> {
        self.online.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.online.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.online.read().is_empty()
    }
}
