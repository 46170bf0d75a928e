//! The roster controller: CRUD through the bound proxy, then refetch.
//!
//! Every mutation follows the same shape:
//!
//! ```text
//! bound? ──no──→ NotAuthenticated (no call)
//!   │yes
//!   ▼
//! mutate ──err──→ RemoteCallFailed (roster untouched, no refetch)
//!   │ok
//!   ▼
//! mark stale ──→ list_players() ──→ Fresh (or Stale + error)
//! ```
//!
//! The roster is never patched locally. After a change it is thrown away
//! and fetched again, so it is always exactly what the backend reported
//! on the last successful round trip.

use std::future::Future;
use std::sync::Arc;

use rosterline_protocol::{Player, PlayerFields, PlayerId};
use rosterline_session::SessionHandle;
use rosterline_transport::{Backend, BackendError};
use tracing::Instrument;

use crate::{EditPlayerDraft, NewPlayerDraft, Operation, Roster, RosterError};

/// Performs roster CRUD against the backend of the current session.
///
/// All operations take `&mut self`, so one controller runs one operation
/// at a time: `Idle → InFlight → Idle`, with no automatic retries.
///
/// The controller never caches the proxy. Each operation asks the session
/// for the current binding once, at its start, and uses that proxy for its
/// refetch too. After sign-out the next call fails with
/// [`RosterError::NotAuthenticated`]; after a re-login calls go out under
/// the new identity.
pub struct RosterController<P> {
    session: SessionHandle<P>,
    roster: Roster,
}

impl<P: Backend> RosterController<P> {
    /// Creates a controller with an empty, stale roster.
    pub fn new(session: SessionHandle<P>) -> Self {
        Self {
            session,
            roster: Roster::new(),
        }
    }

    /// The local roster as of the last successful list.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Fetches every player and replaces the local roster with them.
    ///
    /// # Errors
    /// - [`RosterError::NotAuthenticated`]: nobody signed in, no call made
    /// - [`RosterError::RemoteCallFailed`]: the roster is left as it was
    pub async fn list_players(&mut self) -> Result<&[Player], RosterError> {
        let span = tracing::debug_span!("roster", op = %Operation::List);
        async {
            let proxy = self.proxy(Operation::List).await?;
            self.refresh(&proxy).await
        }
        .instrument(span)
        .await?;
        Ok(self.roster.players())
    }

    /// Creates a player, then refetches the roster.
    ///
    /// An `Ok` means both the create and the refetch succeeded. If the
    /// create succeeded but the refetch failed, the error names
    /// [`Operation::List`] and the roster is left [`Stale`](crate::Freshness::Stale).
    pub async fn add_player(&mut self, fields: &PlayerFields) -> Result<(), RosterError> {
        self.mutate(Operation::Add, |proxy| async move {
            proxy.add_player(fields).await
        })
        .await
    }

    /// Overwrites player `id`, then refetches the roster.
    pub async fn edit_player(
        &mut self,
        id: PlayerId,
        fields: &PlayerFields,
    ) -> Result<(), RosterError> {
        self.mutate(Operation::Edit(id), |proxy| async move {
            proxy.edit_player(id, fields).await
        })
        .await
    }

    /// Removes player `id`, then refetches the roster.
    pub async fn delete_player(&mut self, id: PlayerId) -> Result<(), RosterError> {
        self.mutate(Operation::Delete(id), |proxy| async move {
            proxy.delete_player(id).await
        })
        .await
    }

    /// Submits the "add player" form.
    ///
    /// The draft stays borrowed for the whole round trip, so the same
    /// draft can't be submitted twice at once. It is cleared only once
    /// the backend has accepted the create.
    pub async fn submit_new(&mut self, draft: &mut NewPlayerDraft) -> Result<(), RosterError> {
        let fields = draft.fields()?;
        let result = self.add_player(&fields).await;
        if accepted(&result) {
            draft.clear();
        }
        result
    }

    /// Submits the "edit player" form. Same contract as
    /// [`submit_new`](Self::submit_new).
    pub async fn submit_edit(&mut self, draft: &mut EditPlayerDraft) -> Result<(), RosterError> {
        let (id, fields) = draft.target()?;
        let result = self.edit_player(id, &fields).await;
        if accepted(&result) {
            draft.clear();
        }
        result
    }

    /// One list call through `proxy`. Replaces the roster only on success.
    async fn refresh(&mut self, proxy: &P) -> Result<(), RosterError> {
        let players = proxy
            .list_players()
            .await
            .map_err(|e| failed(Operation::List, e))?;

        tracing::debug!(count = players.len(), "roster refreshed");
        self.roster.replace(players);
        Ok(())
    }

    /// Runs one mutation and, if it went through, the refetch.
    async fn mutate<F, Fut>(&mut self, operation: Operation, call: F) -> Result<(), RosterError>
    where
        F: FnOnce(Arc<P>) -> Fut,
        Fut: Future<Output = Result<(), BackendError>>,
    {
        let span = tracing::debug_span!("roster", op = %operation);
        self.mutate_inner(operation, call).instrument(span).await
    }

    async fn mutate_inner<F, Fut>(
        &mut self,
        operation: Operation,
        call: F,
    ) -> Result<(), RosterError>
    where
        F: FnOnce(Arc<P>) -> Fut,
        Fut: Future<Output = Result<(), BackendError>>,
    {
        // The refetch goes through the same proxy, even if the session
        // changes while the mutation is in flight.
        let proxy = self.proxy(operation).await?;
        call(Arc::clone(&proxy))
            .await
            .map_err(|e| failed(operation, e))?;
        tracing::info!("{operation} accepted");

        // The backend changed, so what we hold no longer matches it.
        self.roster.mark_stale();
        self.refresh(&proxy).await
    }

    /// The proxy of the current session, or `NotAuthenticated`.
    async fn proxy(&self, operation: Operation) -> Result<Arc<P>, RosterError> {
        match self.session.binding().await {
            Some((_, proxy)) => Ok(proxy),
            None => {
                tracing::warn!("{operation} refused: not signed in");
                Err(RosterError::NotAuthenticated)
            }
        }
    }
}

/// Logs a failed remote call and wraps it.
fn failed(operation: Operation, source: BackendError) -> RosterError {
    tracing::warn!(error = %source, "{operation} failed");
    RosterError::RemoteCallFailed { operation, source }
}

/// `true` if the mutation itself went through, even when the refetch
/// after it did not.
fn accepted(result: &Result<(), RosterError>) -> bool {
    match result {
        Ok(()) => true,
        Err(RosterError::RemoteCallFailed { operation, .. }) => !operation.is_mutation(),
        Err(RosterError::NotAuthenticated | RosterError::Draft(_)) => false,
    }
}
