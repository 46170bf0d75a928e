//! Core types: player records, identities, and the backend wire format.
//!
//! Everything in here is plain data. The backend owns the records; the
//! client only ever holds copies of them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The current wire protocol version. A proxy sends this in its
/// handshake so the backend can reject incompatible clients.
pub const PROTOCOL_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Backend-assigned identifier of a player record.
///
/// A "newtype wrapper" around `u64`: you can't accidentally pass some other
/// number where a player id is expected. `#[serde(transparent)]` makes
/// `PlayerId(42)` serialize as just `42`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The principal an identity provider issues to a signed-in user.
///
/// Opaque text: the client never parses it, it only shows it and hands
/// it to the backend during the proxy handshake.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(String);

impl PrincipalId {
    /// Wraps the textual form of a principal.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Returns the textual form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Player records
// ---------------------------------------------------------------------------

/// The editable part of a player record: everything except the id.
///
/// This is what create and update send to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerFields {
    pub first_name: String,
    pub last_name: String,
    pub team: String,
}

impl PlayerFields {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        team: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            team: team.into(),
        }
    }
}

/// A player record as the backend reports it.
///
/// On the wire the fields are camelCase (`firstName`, `lastName`), which
/// is what `#[serde(rename_all = "camelCase")]` produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub first_name: String,
    pub last_name: String,
    pub team: String,
}

impl Player {
    /// Builds a record from an id and its editable fields.
    pub fn from_fields(id: PlayerId, fields: PlayerFields) -> Self {
        Self {
            id,
            first_name: fields.first_name,
            last_name: fields.last_name,
            team: fields.team,
        }
    }

    /// Returns a copy of the editable fields.
    pub fn fields(&self) -> PlayerFields {
        PlayerFields::new(&self.first_name, &self.last_name, &self.team)
    }

    /// Returns `true` if this record carries exactly the given fields.
    pub fn matches(&self, fields: &PlayerFields) -> bool {
        self.first_name == fields.first_name
            && self.last_name == fields.last_name
            && self.team == fields.team
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} - {}", self.first_name, self.last_name, self.team)
    }
}

// ---------------------------------------------------------------------------
// Wire messages
// ---------------------------------------------------------------------------

/// A request sent by a backend proxy.
///
/// `#[serde(tag = "type")]` produces internally tagged JSON:
///   `{ "type": "DeletePlayer", "id": 7 }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    /// First message on every connection: who is calling.
    Handshake {
        version: u32,
        principal: PrincipalId,
    },

    /// "Give me every player, in your order."
    ListPlayers,

    /// "Create a player with these fields." The backend assigns the id.
    AddPlayer { player: PlayerFields },

    /// "Overwrite the fields of player `id`."
    EditPlayer { id: PlayerId, player: PlayerFields },

    /// "Remove player `id`."
    DeletePlayer { id: PlayerId },
}

impl Request {
    /// Short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Handshake { .. } => "Handshake",
            Self::ListPlayers => "ListPlayers",
            Self::AddPlayer { .. } => "AddPlayer",
            Self::EditPlayer { .. } => "EditPlayer",
            Self::DeletePlayer { .. } => "DeletePlayer",
        }
    }
}

/// The backend's answer to a [`Request`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Reply {
    /// Handshake accepted; the connection is bound to the principal.
    HandshakeAck,

    /// Answer to `ListPlayers`.
    Players { players: Vec<Player> },

    /// A mutation succeeded. Mutations carry no payload back.
    Done,

    /// The backend rejected the request.
    /// `code` follows HTTP-style conventions (401, 404, ...).
    Error { code: u16, message: String },
}

/// The top-level wire wrapper. Every message on the wire is an Envelope.
///
/// A reply carries the `seq` of the request it answers, so a proxy can
/// match them up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub seq: u64,
    pub payload: T,
}

// =========================================================================
// Tests
// =========================================================================
