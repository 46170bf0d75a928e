//! Error types for the roster layer.

use std::fmt;

use rosterline_protocol::PlayerId;
use rosterline_transport::BackendError;

use crate::DraftError;

/// The roster operation a log line or error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Add,
    Edit(PlayerId),
    Delete(PlayerId),
}

impl Operation {
    /// `true` for operations that change the backend.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Self::List)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => write!(f, "list players"),
            Self::Add => write!(f, "add player"),
            Self::Edit(id) => write!(f, "edit player {id}"),
            Self::Delete(id) => write!(f, "delete player {id}"),
        }
    }
}

/// Errors that can occur during roster operations.
///
/// None of these are fatal: the session and roster stay in their last
/// valid state and the caller may try again.
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    /// Nobody is signed in, so there is no proxy. No remote call was made.
    #[error("not signed in")]
    NotAuthenticated,

    /// The backend call failed. The local roster was not touched.
    #[error("{operation} failed: {source}")]
    RemoteCallFailed {
        operation: Operation,
        #[source]
        source: BackendError,
    },

    /// The draft is incomplete. No remote call was made.
    #[error(transparent)]
    Draft(#[from] DraftError),
}

impl RosterError {
    /// The backend error behind a failed remote call, if that's what this is.
    pub fn backend_error(&self) -> Option<&BackendError> {
        match self {
            Self::RemoteCallFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}
