//! Data model and wire protocol for Rosterline.
//!
//! This crate defines the types every other layer agrees on:
//!
//! - **Records** ([`Player`], [`PlayerFields`], [`PlayerId`]): what the
//!   backend stores and the client caches.
//! - **Identity** ([`PrincipalId`]): who the signed-in user is.
//! - **Wire messages** ([`Envelope`], [`Request`], [`Reply`]): what a
//!   backend proxy sends over the network.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those messages
//!   are converted to/from bytes.
//! - **Errors** ([`ProtocolError`]): what can go wrong during
//!   encoding/decoding.
//!
//! # Architecture
//!
//! The protocol layer sits below everything else. It doesn't know about
//! sessions or connections. It only knows what a player record looks
//! like and how to serialize it.
//!
//! ```text
//! Roster (cache) → Session (identity + proxy) → Transport (proxy) → Protocol (bytes)
//! ```

// ---------------------------------------------------------------------------
// Module declarations
// ---------------------------------------------------------------------------

mod codec;
mod error;
mod types;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

// Users write `use rosterline_protocol::Player` instead of
// `use rosterline_protocol::types::Player`.

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    Envelope, Player, PlayerFields, PlayerId, PrincipalId, Reply, Request,
    PROTOCOL_VERSION,
};
