//! Roster synchronization for Rosterline.
//!
//! The backend owns the players; the client keeps a read-only copy (the
//! "local roster") and changes players only through remote calls. After
//! every successful change the whole roster is fetched again, so what the
//! client shows is always exactly what the backend last reported.
//!
//! # Key types
//!
//! - [`RosterController`]: CRUD through the session's bound proxy
//! - [`Roster`]: the local copy and whether it can be trusted
//! - [`NewPlayerDraft`], [`EditPlayerDraft`]: form state before submit
//! - [`RosterError`]: what can go wrong

mod controller;
mod draft;
mod error;
mod roster;

pub use controller::RosterController;
pub use draft::{DraftError, EditPlayerDraft, NewPlayerDraft};
pub use error::{Operation, RosterError};
pub use roster::{Freshness, Roster};
