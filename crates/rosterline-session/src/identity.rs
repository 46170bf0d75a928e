//! The identity-provider hook and a development provider.
//!
//! Rosterline doesn't implement authentication itself; an external
//! identity provider does. It shows its own login dialog, talks to its
//! own servers, and eventually says "this user is principal X".
//!
//! Instead, Rosterline defines the [`IdentityProvider`] trait: the four
//! calls the session manager needs from any provider. Login is modeled
//! as a suspending call that resolves to success or an error, rather than
//! as a callback, so the session transition happens in a known order.

use std::future::Future;
use std::sync::{Mutex, PoisonError};

use rand::Rng;
use rosterline_protocol::PrincipalId;

use crate::SessionError;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Who the signed-in user is, as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity {
    principal: PrincipalId,
}

impl Identity {
    /// Creates an identity from the textual form of a principal.
    pub fn new(principal: impl Into<String>) -> Self {
        Self::from_principal(PrincipalId::new(principal))
    }

    pub fn from_principal(principal: PrincipalId) -> Self {
        Self { principal }
    }

    /// The principal this identity speaks for.
    pub fn principal(&self) -> &PrincipalId {
        &self.principal
    }
}

// ---------------------------------------------------------------------------
// IdentityProvider
// ---------------------------------------------------------------------------

/// Options passed to [`IdentityProvider::login`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginOptions {
    /// Where the provider should run its login flow. `None` means the
    /// provider's own default endpoint.
    pub identity_provider: Option<String>,
}

/// An external identity provider.
///
/// # Trait bounds
///
/// - `Send + Sync` → the provider lives inside the session manager,
///   which may be used from any Tokio task.
/// - `'static` → it doesn't borrow temporary data; it lives as long as
///   the session manager.
///
/// # Example
///
/// ```rust
/// use rosterline_session::{Identity, IdentityProvider, LoginOptions, SessionError};
///
/// /// Signs everyone in as the same principal.
/// struct FixedProvider;
///
/// impl IdentityProvider for FixedProvider {
///     async fn login(&self, _options: &LoginOptions) -> Result<(), SessionError> {
///         Ok(())
///     }
///     async fn logout(&self) -> Result<(), SessionError> {
///         Ok(())
///     }
///     async fn is_authenticated(&self) -> Result<bool, SessionError> {
///         Ok(true)
///     }
///     fn identity(&self) -> Option<Identity> {
///         Some(Identity::new("2vxsx-fae"))
///     }
/// }
/// ```
pub trait IdentityProvider: Send + Sync + 'static {
    /// Runs the provider's login flow.
    ///
    /// Resolves once the provider reports success (`Ok`) or failure
    /// (`Err(SessionError::AuthFlowFailed)`). If the user walks away from
    /// the flow and the provider never reports back, this never resolves.
    fn login(
        &self,
        options: &LoginOptions,
    ) -> impl Future<Output = Result<(), SessionError>> + Send;

    /// Ends the provider-side session.
    fn logout(&self) -> impl Future<Output = Result<(), SessionError>> + Send;

    /// Asks whether the provider still holds a valid session, e.g. one
    /// left over from a previous run.
    fn is_authenticated(
        &self,
    ) -> impl Future<Output = Result<bool, SessionError>> + Send;

    /// The currently authenticated identity, if any.
    fn identity(&self) -> Option<Identity>;
}

// ---------------------------------------------------------------------------
// DevIdentityProvider
// ---------------------------------------------------------------------------

/// A local identity provider for development and demos.
///
/// Login succeeds immediately, with either a fixed principal or a random
/// one per login. Never use this in production: it authenticates anyone.
#[derive(Debug, Default)]
pub struct DevIdentityProvider {
    fixed: Option<PrincipalId>,
    inner: Mutex<DevState>,
}

#[derive(Debug, Default)]
struct DevState {
    current: Option<Identity>,
    last_login: Option<LoginOptions>,
}

impl DevIdentityProvider {
    /// A provider that hands out a random principal on every login.
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider that always signs in as `principal`.
    pub fn with_principal(principal: impl Into<String>) -> Self {
        Self {
            fixed: Some(PrincipalId::new(principal)),
            ..Self::default()
        }
    }

    /// A provider that already holds a session for `principal`, as if the
    /// user signed in during a previous run.
    pub fn signed_in(principal: impl Into<String>) -> Self {
        let principal = PrincipalId::new(principal);
        Self {
            inner: Mutex::new(DevState {
                current: Some(Identity::from_principal(principal.clone())),
                last_login: None,
            }),
            fixed: Some(principal),
        }
    }

    /// The options passed to the most recent login, if any.
    pub fn last_login(&self) -> Option<LoginOptions> {
        self.lock().last_login.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DevState> {
        // Nothing in here can be left half-updated by a panic.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl IdentityProvider for DevIdentityProvider {
    async fn login(&self, options: &LoginOptions) -> Result<(), SessionError> {
        let principal = self
            .fixed
            .clone()
            .unwrap_or_else(|| PrincipalId::new(generate_principal()));
        tracing::debug!(
            %principal,
            endpoint = options.identity_provider.as_deref().unwrap_or("default"),
            "dev provider login"
        );

        let mut state = self.lock();
        state.current = Some(Identity::from_principal(principal));
        state.last_login = Some(options.clone());
        Ok(())
    }

    async fn logout(&self) -> Result<(), SessionError> {
        self.lock().current = None;
        Ok(())
    }

    async fn is_authenticated(&self) -> Result<bool, SessionError> {
        Ok(self.lock().current.is_some())
    }

    fn identity(&self) -> Option<Identity> {
        self.lock().current.clone()
    }
}

/// Generates a random 32-character hex principal (128 bits).
fn generate_principal() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 16] = rng.random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
