//! Sign-in session management for Rosterline.
//!
//! This crate handles the lifecycle of the signed-in user:
//!
//! 1. **Authentication**: talking to an external identity provider
//!    ([`IdentityProvider`] trait)
//! 2. **Binding**: building a backend proxy for the signed-in identity
//!    ([`ProxyFactory`])
//! 3. **Session tracking**: knowing whether anyone is signed in and which
//!    proxy belongs to them ([`SessionManager`], [`SessionState`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Roster Layer (above)  ← reads the bound proxy through a SessionHandle
//!     ↕
//! Session Layer (this crate)  ← owns identity and proxy lifecycle
//!     ↕
//! Protocol Layer (below)  ← provides PrincipalId
//! ```

mod binder;
mod config;
mod error;
mod identity;
mod manager;
mod state;

pub use binder::ProxyFactory;
pub use config::{DeploymentMode, ProviderConfig};
pub use error::SessionError;
pub use identity::{DevIdentityProvider, Identity, IdentityProvider, LoginOptions};
pub use manager::SessionManager;
pub use state::{SessionHandle, SessionState};
