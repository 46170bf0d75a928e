//! In-process backend: a player store behind a mutex.
//!
//! Used in local mode and by tests. Clones share one store, so a test can
//! keep a clone to inspect what the client did while the session holds
//! another clone as its proxy.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use rosterline_protocol::{Player, PlayerFields, PlayerId, PrincipalId};
use tokio::sync::Mutex;

use crate::{Backend, BackendError};

#[derive(Debug, Default)]
struct Store {
    /// Last id handed out. Ids start at 1 and are never reused.
    last_id: u64,
    /// Players in insertion order. That is also the list order.
    players: Vec<Player>,
}

/// A [`Backend`] that keeps players in memory.
///
/// A fresh `MemoryBackend` is unbound: calls on it are rejected with 401
/// until [`bind`](Self::bind) produces a proxy for a principal.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    store: Arc<Mutex<Store>>,
    calls: Arc<AtomicU64>,
    principal: Option<PrincipalId>,
}

impl MemoryBackend {
    /// Creates an empty, unbound backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an unbound backend pre-filled with `players`.
    ///
    /// New ids continue after the largest seeded id.
    pub fn with_players(players: Vec<Player>) -> Self {
        let last_id = players.iter().map(|p| p.id.0).max().unwrap_or(0);
        Self {
            store: Arc::new(Mutex::new(Store { last_id, players })),
            ..Self::default()
        }
    }

    /// Returns a proxy onto the same store, bound to `principal`.
    pub fn bind(&self, principal: &PrincipalId) -> Self {
        Self {
            store: Arc::clone(&self.store),
            calls: Arc::clone(&self.calls),
            principal: Some(principal.clone()),
        }
    }

    /// The principal this proxy is bound to, if any.
    pub fn principal(&self) -> Option<&PrincipalId> {
        self.principal.as_ref()
    }

    /// Total remote calls made through any clone of this backend,
    /// rejected ones included.
    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Current contents of the store. Not counted as a call.
    pub async fn snapshot(&self) -> Vec<Player> {
        self.store.lock().await.players.clone()
    }

    /// Counts the call and checks the proxy is bound.
    fn begin(&self, op: &'static str) -> Result<&PrincipalId, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let principal = self
            .principal
            .as_ref()
            .ok_or_else(|| BackendError::rejected(401, "proxy is not bound to an identity"))?;
        tracing::debug!(op, %principal, "memory backend call");
        Ok(principal)
    }
}

impl Backend for MemoryBackend {
    async fn list_players(&self) -> Result<Vec<Player>, BackendError> {
        self.begin("list")?;
        Ok(self.store.lock().await.players.clone())
    }

    async fn add_player(&self, fields: &PlayerFields) -> Result<(), BackendError> {
        self.begin("create")?;
        let mut store = self.store.lock().await;
        store.last_id += 1;
        let id = PlayerId(store.last_id);
        store.players.push(Player::from_fields(id, fields.clone()));
        Ok(())
    }

    async fn edit_player(
        &self,
        id: PlayerId,
        fields: &PlayerFields,
    ) -> Result<(), BackendError> {
        self.begin("update")?;
        let mut store = self.store.lock().await;
        let player = store
            .players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| BackendError::rejected(404, format!("player {id} not found")))?;
        *player = Player::from_fields(id, fields.clone());
        Ok(())
    }

    async fn delete_player(&self, id: PlayerId) -> Result<(), BackendError> {
        self.begin("delete")?;
        let mut store = self.store.lock().await;
        let before = store.players.len();
        store.players.retain(|p| p.id != id);
        if store.players.len() == before {
            return Err(BackendError::rejected(404, format!("player {id} not found")));
        }
        Ok(())
    }
}
