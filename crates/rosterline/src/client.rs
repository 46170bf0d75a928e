//! `RosterClient` builder and the client itself.
//!
//! This is the entry point for applications. It ties the layers together:
//! identity provider → session → bound proxy → roster.

use rosterline_protocol::{Player, PlayerFields, PlayerId};
use rosterline_roster::{EditPlayerDraft, NewPlayerDraft, Roster, RosterController};
use rosterline_session::{
    Identity, IdentityProvider, ProviderConfig, ProxyFactory, SessionManager, SessionState,
};
use rosterline_transport::Backend;

use crate::RosterlineError;

/// Builder for configuring and starting a roster client.
///
/// # Example
///
/// ```rust,ignore
/// use rosterline::prelude::*;
///
/// let backend = MemoryBackend::new();
/// let mut client = RosterClientBuilder::new()
///     .provider_config(ProviderConfig::from_env())
///     .build(DevIdentityProvider::new(), move |id: Identity| {
///         backend.bind(id.principal())
///     })
///     .await?;
///
/// client.sign_in().await?;
/// client.list_players().await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct RosterClientBuilder {
    config: ProviderConfig,
}

impl RosterClientBuilder {
    /// Creates a new builder with default settings (production mode).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets where sign-in is sent.
    pub fn provider_config(mut self, config: ProviderConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds the client and restores any session the provider still
    /// holds from a previous run.
    ///
    /// # Errors
    /// Returns [`RosterlineError::Session`] if asking the provider about an
    /// existing session fails. No login dialog is ever opened here.
    pub async fn build<I, F>(
        self,
        provider: I,
        factory: F,
    ) -> Result<RosterClient<I, F>, RosterlineError>
    where
        I: IdentityProvider,
        F: ProxyFactory,
        F::Proxy: Backend,
    {
        let session = SessionManager::new(provider, factory, self.config);
        let restored = session.restore_session().await?;
        tracing::info!(restored, "roster client ready");

        let roster = RosterController::new(session.handle());
        Ok(RosterClient { session, roster })
    }
}

/// A signed-in (or not yet signed-in) roster client.
///
/// Owns the [`SessionManager`] and a [`RosterController`] reading the
/// manager's binding. Session calls take `&self`; roster calls take
/// `&mut self` because they update the local roster.
pub struct RosterClient<I: IdentityProvider, F: ProxyFactory> {
    session: SessionManager<I, F>,
    roster: RosterController<F::Proxy>,
}

impl<I, F> RosterClient<I, F>
where
    I: IdentityProvider,
    F: ProxyFactory,
    F::Proxy: Backend,
{
    // -- Session ----------------------------------------------------------

    /// Runs the provider's login flow and binds a proxy to the result.
    pub async fn sign_in(&self) -> Result<Identity, RosterlineError> {
        Ok(self.session.sign_in().await?)
    }

    /// Ends the session. Roster calls fail with `NotAuthenticated` after
    /// this returns `Ok`.
    pub async fn sign_out(&self) -> Result<(), RosterlineError> {
        Ok(self.session.sign_out().await?)
    }

    /// `true` if a proxy is currently bound.
    pub async fn is_authenticated(&self) -> bool {
        self.session.state().await.is_authenticated()
    }

    /// The signed-in identity, if any.
    pub async fn identity(&self) -> Option<Identity> {
        self.session.state().await.identity().cloned()
    }

    /// A snapshot of the session state.
    pub async fn session_state(&self) -> SessionState<F::Proxy> {
        self.session.state().await
    }

    /// The session manager, for anything not forwarded here.
    pub fn session(&self) -> &SessionManager<I, F> {
        &self.session
    }

    // -- Roster -----------------------------------------------------------

    /// The local roster as of the last successful list.
    pub fn roster(&self) -> &Roster {
        self.roster.roster()
    }

    /// Fetches every player and replaces the local roster.
    pub async fn list_players(&mut self) -> Result<&[Player], RosterlineError> {
        Ok(self.roster.list_players().await?)
    }

    /// Creates a player, then refetches.
    pub async fn add_player(&mut self, fields: &PlayerFields) -> Result<(), RosterlineError> {
        Ok(self.roster.add_player(fields).await?)
    }

    /// Overwrites player `id`, then refetches.
    pub async fn edit_player(
        &mut self,
        id: PlayerId,
        fields: &PlayerFields,
    ) -> Result<(), RosterlineError> {
        Ok(self.roster.edit_player(id, fields).await?)
    }

    /// Removes player `id`, then refetches.
    pub async fn delete_player(&mut self, id: PlayerId) -> Result<(), RosterlineError> {
        Ok(self.roster.delete_player(id).await?)
    }

    /// Submits the "add player" form; clears it on success.
    pub async fn submit_new(&mut self, draft: &mut NewPlayerDraft) -> Result<(), RosterlineError> {
        Ok(self.roster.submit_new(draft).await?)
    }

    /// Submits the "edit player" form; clears it on success.
    pub async fn submit_edit(
        &mut self,
        draft: &mut EditPlayerDraft,
    ) -> Result<(), RosterlineError> {
        Ok(self.roster.submit_edit(draft).await?)
    }
}
