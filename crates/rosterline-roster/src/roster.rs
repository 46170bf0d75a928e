//! The local roster: a read-only copy of the backend's players.

use rosterline_protocol::{Player, PlayerId};

/// Whether the local roster can be trusted.
///
/// ```text
///   Stale ──(successful list)──→ Fresh
///     ↑                            │
///     └──(successful mutation)─────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Freshness {
    /// Never fetched, or the backend changed since the last fetch.
    #[default]
    Stale,
    /// Exactly what the backend reported on the last successful list.
    Fresh,
}

/// The client's copy of the player list.
///
/// Only the controller changes it, and only in two ways: replace
/// everything after a successful list, or mark it stale after a
/// successful mutation. There is no partial update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    players: Vec<Player>,
    freshness: Freshness,
}

impl Roster {
    /// An empty, stale roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// The players, in backend order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn freshness(&self) -> Freshness {
        self.freshness
    }

    pub fn is_fresh(&self) -> bool {
        self.freshness == Freshness::Fresh
    }

    /// Looks up a player by id.
    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.get(id).is_some()
    }

    pub(crate) fn replace(&mut self, players: Vec<Player>) {
        self.players = players;
        self.freshness = Freshness::Fresh;
    }

    pub(crate) fn mark_stale(&mut self) {
        self.freshness = Freshness::Stale;
    }
}
