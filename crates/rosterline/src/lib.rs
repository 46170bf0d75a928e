//! # Rosterline
//!
//! Signed-in roster management against a remote player backend.
//!
//! Rosterline keeps two pieces of client state in step with the outside
//! world: *who is signed in* (driven by an external identity provider) and
//! *which players exist* (owned by a remote backend). Every backend call
//! goes out through a proxy bound to the signed-in identity, and after
//! every change the roster is fetched again so the client never guesses.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rosterline::prelude::*;
//!
//! # async fn run() -> Result<(), RosterlineError> {
//! let backend = MemoryBackend::new();
//! let mut client = RosterClientBuilder::new()
//!     .provider_config(ProviderConfig::from_env())
//!     .build(DevIdentityProvider::new(), move |id: Identity| {
//!         backend.bind(id.principal())
//!     })
//!     .await?;
//!
//! client.sign_in().await?;
//! client
//!     .add_player(&PlayerFields::new("Jane", "Doe", "Red"))
//!     .await?;
//! for player in client.roster().players() {
//!     println!("{player}");
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod error;

pub use client::{RosterClient, RosterClientBuilder};
pub use error::RosterlineError;

pub use rosterline_protocol as protocol;
pub use rosterline_roster as roster;
pub use rosterline_session as session;
pub use rosterline_transport as transport;

/// Everything an application usually needs, in one import.
pub mod prelude {
    pub use crate::{RosterClient, RosterClientBuilder, RosterlineError};
    pub use rosterline_protocol::{Player, PlayerFields, PlayerId, PrincipalId};
    pub use rosterline_roster::{
        DraftError, EditPlayerDraft, Freshness, NewPlayerDraft, Operation, Roster, RosterError,
    };
    pub use rosterline_session::{
        DeploymentMode, DevIdentityProvider, Identity, IdentityProvider, LoginOptions,
        ProviderConfig, ProxyFactory, SessionError, SessionState,
    };
    pub use rosterline_transport::{Backend, BackendError, MemoryBackend, WebSocketBackend};
}
