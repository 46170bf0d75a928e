//! Backend proxies for Rosterline.
//!
//! The backend service lives somewhere else; this crate is the client's
//! side of it. The [`Backend`] trait names the four remote operations the
//! roster needs, and two proxies implement it:
//!
//! - [`WebSocketBackend`]: talks to a real backend over WebSocket,
//!   bound to one signed-in principal.
//! - [`MemoryBackend`]: an in-process store for local mode, demos,
//!   and tests.
//!
//! # Feature Flags
//!
//! - `websocket` (default): WebSocket proxy via `tokio-tungstenite`

mod error;
mod memory;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::BackendError;
pub use memory::MemoryBackend;
#[cfg(feature = "websocket")]
pub use websocket::WebSocketBackend;

use std::future::Future;

use rosterline_protocol::{Player, PlayerFields, PlayerId};

/// The remote operations of the roster backend.
///
/// Every call is one round trip. Implementations never retry: a failure
/// is reported to the caller, who decides what to do.
///
/// # Trait bounds
///
/// - `Send + Sync` → a proxy is shared (behind `Arc`) between the
///   session and whoever performs roster calls.
/// - The returned futures are `Send` so calls can run inside
///   `tokio::spawn`ed tasks.
pub trait Backend: Send + Sync + 'static {
    /// Returns every player, in the backend's order.
    fn list_players(
        &self,
    ) -> impl Future<Output = Result<Vec<Player>, BackendError>> + Send;

    /// Creates a player. The backend assigns the id.
    fn add_player(
        &self,
        fields: &PlayerFields,
    ) -> impl Future<Output = Result<(), BackendError>> + Send;

    /// Overwrites the fields of an existing player.
    fn edit_player(
        &self,
        id: PlayerId,
        fields: &PlayerFields,
    ) -> impl Future<Output = Result<(), BackendError>> + Send;

    /// Removes a player.
    fn delete_player(
        &self,
        id: PlayerId,
    ) -> impl Future<Output = Result<(), BackendError>> + Send;
}
