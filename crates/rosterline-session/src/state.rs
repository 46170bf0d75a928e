//! Session state: who is signed in, and the proxy that speaks for them.

use std::fmt;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::Identity;

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// The current session.
///
/// ```text
///   Anonymous ──(sign_in / restore_session)──→ Authenticated
///       ↑                                           │
///       └───────────────(sign_out)──────────────────┘
/// ```
///
/// The proxy lives inside the `Authenticated` variant, so "a proxy exists
/// iff someone is signed in" holds by construction. Identity and proxy are
/// always replaced together.
pub enum SessionState<P> {
    /// Nobody is signed in. No proxy exists.
    Anonymous,

    /// Signed in as `identity`; `proxy` is bound to that identity.
    Authenticated { identity: Identity, proxy: Arc<P> },
}

impl<P> SessionState<P> {
    /// Returns `true` if someone is signed in.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    /// The signed-in identity, if any.
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated { identity, .. } => Some(identity),
        }
    }

    /// The bound proxy, if any.
    pub fn proxy(&self) -> Option<&Arc<P>> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated { proxy, .. } => Some(proxy),
        }
    }
}

// Written by hand so that `P` needn't be `Clone` / `Debug`: cloning only
// bumps the `Arc`.
impl<P> Clone for SessionState<P> {
    fn clone(&self) -> Self {
        match self {
            Self::Anonymous => Self::Anonymous,
            Self::Authenticated { identity, proxy } => Self::Authenticated {
                identity: identity.clone(),
                proxy: Arc::clone(proxy),
            },
        }
    }
}

impl<P> fmt::Debug for SessionState<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous => write!(f, "Anonymous"),
            Self::Authenticated { identity, .. } => f
                .debug_struct("Authenticated")
                .field("principal", identity.principal())
                .finish_non_exhaustive(),
        }
    }
}

// ---------------------------------------------------------------------------
// SessionHandle
// ---------------------------------------------------------------------------

/// Read-only access to a [`SessionManager`](crate::SessionManager)'s state.
///
/// This is what the roster layer holds. It can look at the current
/// binding but never change it; only the manager signs in and out.
pub struct SessionHandle<P> {
    state: Arc<RwLock<SessionState<P>>>,
}

impl<P> SessionHandle<P> {
    pub(crate) fn new(state: Arc<RwLock<SessionState<P>>>) -> Self {
        Self { state }
    }

    /// A snapshot of the current state.
    pub async fn state(&self) -> SessionState<P> {
        self.state.read().await.clone()
    }

    /// The current identity and its proxy, taken together in one read so
    /// they always belong to each other.
    pub async fn binding(&self) -> Option<(Identity, Arc<P>)> {
        match &*self.state.read().await {
            SessionState::Anonymous => None,
            SessionState::Authenticated { identity, proxy } => {
                Some((identity.clone(), Arc::clone(proxy)))
            }
        }
    }
}

impl<P> Clone for SessionHandle<P> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<P> fmt::Debug for SessionHandle<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionHandle").finish_non_exhaustive()
    }
}
