//! Building backend proxies for a signed-in identity.

use crate::Identity;

/// Constructs the backend proxy for a freshly signed-in identity.
///
/// The session manager calls this once per successful sign-in (or
/// restore) and stores the result next to the identity. Any
/// `Fn(Identity) -> P` closure works:
///
/// ```rust
/// use rosterline_session::{Identity, ProxyFactory};
///
/// struct Proxy(String);
///
/// let factory = |identity: Identity| Proxy(identity.principal().to_string());
/// let proxy = factory.bind(&Identity::new("aaaaa-aa"));
/// assert_eq!(proxy.0, "aaaaa-aa");
/// ```
pub trait ProxyFactory: Send + Sync + 'static {
    /// The proxy type this factory produces.
    type Proxy: Send + Sync + 'static;

    /// Returns a proxy whose calls identify as `identity`.
    fn bind(&self, identity: &Identity) -> Self::Proxy;
}

impl<F, P> ProxyFactory for F
where
    F: Fn(Identity) -> P + Send + Sync + 'static,
    P: Send + Sync + 'static,
{
    type Proxy = P;

    fn bind(&self, identity: &Identity) -> P {
        self(identity.clone())
    }
}
