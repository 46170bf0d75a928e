//! Error types for the protocol layer.
//!
//! Each crate in Rosterline defines its own error enum. When you see a
//! `ProtocolError`, you know the problem is in serialization or in the
//! shape of a message, not in networking or in the session.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    ///
    /// The inner `serde_json::Error` is the original error from serde_json.
    /// We wrap it so callers deal with `ProtocolError` uniformly,
    /// regardless of which codec produced the error.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a Rust type).
    ///
    /// Common causes: malformed JSON, missing required fields,
    /// wrong data types, or truncated messages.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The message parsed but makes no sense at this point of the exchange,
    /// e.g. a `Players` reply to a `DeletePlayer` request.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
