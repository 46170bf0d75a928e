//! The session manager: owns the sign-in session and its bound proxy.
//!
//! This is the central piece of the session layer. It's responsible for:
//! - Driving the provider's login and logout flows
//! - Restoring a session left over from a previous run
//! - Building a fresh proxy for every new identity
//! - Publishing the current binding to [`SessionHandle`]s
//!
//! # Atomic binding
//!
//! Identity and proxy are swapped with a single write to the shared
//! state. A handle reading concurrently sees either the whole old binding
//! or the whole new one, never a proxy paired with someone else's
//! identity.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    Identity, IdentityProvider, ProviderConfig, ProxyFactory, SessionError,
    SessionHandle, SessionState,
};

/// Owns the one sign-in session of the client.
///
/// ## Lifecycle
///
/// ```text
/// new() ──→ restore_session() ──→ sign_in() ⇄ sign_out() ──→ drop
///              │                      │
///              ▼                      ▼
///        [Authenticated]        [Authenticated]
///         or [Anonymous]
/// ```
///
/// Create one at startup, call [`restore_session`](Self::restore_session)
/// once, and hand [`handle`](Self::handle)s to whoever needs the proxy.
pub struct SessionManager<I: IdentityProvider, F: ProxyFactory> {
    provider: I,
    factory: F,
    config: ProviderConfig,
    state: Arc<RwLock<SessionState<F::Proxy>>>,
}

impl<I: IdentityProvider, F: ProxyFactory> SessionManager<I, F> {
    /// Creates a manager in the `Anonymous` state.
    pub fn new(provider: I, factory: F, config: ProviderConfig) -> Self {
        Self {
            provider,
            factory,
            config,
            state: Arc::new(RwLock::new(SessionState::Anonymous)),
        }
    }

    /// Runs the provider's login flow and binds a proxy to the result.
    ///
    /// Suspends until the provider reports back. Signing in while already
    /// signed in re-binds to whatever identity the provider now reports.
    ///
    /// # Errors
    /// [`SessionError::AuthFlowFailed`] if the provider rejects the login
    /// or has no identity afterwards. The state is left as it was.
    pub async fn sign_in(&self) -> Result<Identity, SessionError> {
        let options = self.config.login_options();
        tracing::debug!(
            mode = %self.config.mode,
            endpoint = options.identity_provider.as_deref().unwrap_or("default"),
            "starting login flow"
        );

        if let Err(e) = self.provider.login(&options).await {
            tracing::warn!(error = %e, "login failed");
            return Err(e);
        }

        let identity = self.provider.identity().ok_or_else(|| {
            SessionError::AuthFlowFailed(
                "provider reported success without an identity".into(),
            )
        })?;

        self.bind(identity.clone()).await;
        Ok(identity)
    }

    /// Ends the session with the provider, then drops identity and proxy.
    ///
    /// Calling this while already `Anonymous` is fine: the provider is
    /// still asked to log out (it may hold a session we never restored),
    /// and the state stays `Anonymous`.
    ///
    /// # Errors
    /// [`SessionError::AuthFlowFailed`] if the provider's logout fails.
    /// The state is left as it was.
    pub async fn sign_out(&self) -> Result<(), SessionError> {
        if let Err(e) = self.provider.logout().await {
            tracing::warn!(error = %e, "logout failed");
            return Err(e);
        }

        let previous = std::mem::replace(
            &mut *self.state.write().await,
            SessionState::Anonymous,
        );
        match previous.identity() {
            Some(identity) => {
                tracing::info!(principal = %identity.principal(), "signed out")
            }
            None => tracing::debug!("sign out while anonymous"),
        }
        Ok(())
    }

    /// Picks up a provider session left over from a previous run.
    ///
    /// Call once at startup. Performs the same binding as
    /// [`sign_in`](Self::sign_in) but never shows a login flow. Returns
    /// `true` if a session was restored.
    pub async fn restore_session(&self) -> Result<bool, SessionError> {
        if !self.provider.is_authenticated().await? {
            tracing::debug!("no existing session to restore");
            return Ok(false);
        }

        match self.provider.identity() {
            Some(identity) => {
                self.bind(identity).await;
                Ok(true)
            }
            None => {
                tracing::warn!("provider is authenticated but has no identity");
                Ok(false)
            }
        }
    }

    /// A snapshot of the current state.
    pub async fn state(&self) -> SessionState<F::Proxy> {
        self.state.read().await.clone()
    }

    /// A read-only handle onto this manager's state.
    pub fn handle(&self) -> SessionHandle<F::Proxy> {
        SessionHandle::new(Arc::clone(&self.state))
    }

    /// The identity provider.
    pub fn provider(&self) -> &I {
        &self.provider
    }

    /// The provider configuration.
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Builds a proxy for `identity` and publishes both in one write.
    async fn bind(&self, identity: Identity) {
        // Build outside the lock; readers keep seeing the old binding
        // until the swap below.
        let proxy = Arc::new(self.factory.bind(&identity));
        tracing::info!(principal = %identity.principal(), "signed in, proxy bound");
        *self.state.write().await =
            SessionState::Authenticated { identity, proxy };
    }
}

// =========================================================================
// Tests
// =========================================================================
