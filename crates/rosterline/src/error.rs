//! Unified error type for Rosterline.

use rosterline_protocol::ProtocolError;
use rosterline_roster::RosterError;
use rosterline_session::SessionError;
use rosterline_transport::BackendError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `rosterline` crate you deal with this single error type
/// instead of importing errors from each sub-crate. The `#[from]` attribute
/// on each variant generates the `From` impls, so `?` converts sub-crate
/// errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum RosterlineError {
    /// Sign-in or sign-out failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A roster operation failed (not signed in, remote call, draft).
    #[error(transparent)]
    Roster(#[from] RosterError),

    /// A backend call failed outside a roster operation.
    ///
    /// [`RosterClient`](crate::RosterClient) never returns this: its backend
    /// failures arrive inside [`RosterError::RemoteCallFailed`]. It shows up
    /// when application code calls a [`Backend`](rosterline_transport::Backend)
    /// directly and uses `?` in a function returning `RosterlineError`.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Encoding or decoding a wire message failed.
    ///
    /// Like [`Backend`](Self::Backend), only seen from direct use of
    /// [`protocol`](crate::protocol), e.g. a custom
    /// [`Codec`](rosterline_protocol::Codec).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

impl RosterlineError {
    /// `true` if the failure was caused by nobody being signed in.
    pub fn is_not_authenticated(&self) -> bool {
        matches!(self, Self::Roster(RosterError::NotAuthenticated))
    }
}
