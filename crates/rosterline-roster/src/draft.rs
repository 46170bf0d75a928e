//! Form state for creating and editing players.
//!
//! A draft is a scratch buffer the user types into. It is never sent
//! anywhere until submitted, and it is only cleared when a submission
//! succeeds; after a failure the user still has what they typed.

use rosterline_protocol::{Player, PlayerFields, PlayerId};

/// Why a draft can't be submitted yet.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    /// A required field is empty (or only whitespace).
    #[error("{0} is required")]
    MissingField(&'static str),

    /// An edit draft that was never loaded with a player.
    #[error("no player selected for editing")]
    NoPlayerSelected,
}

/// Checks the three required fields and builds the payload.
///
/// Values are sent exactly as typed; trimming is only used for the
/// emptiness check.
fn required_fields(
    first_name: &str,
    last_name: &str,
    team: &str,
) -> Result<PlayerFields, DraftError> {
    for (name, value) in [
        ("first name", first_name),
        ("last name", last_name),
        ("team", team),
    ] {
        if value.trim().is_empty() {
            return Err(DraftError::MissingField(name));
        }
    }
    Ok(PlayerFields::new(first_name, last_name, team))
}

// ---------------------------------------------------------------------------
// NewPlayerDraft
// ---------------------------------------------------------------------------

/// The "add player" form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPlayerDraft {
    pub first_name: String,
    pub last_name: String,
    pub team: String,
}

impl NewPlayerDraft {
    /// An empty draft.
    pub fn new() -> Self {
        Self::default()
    }

    /// The fields to submit, if all of them are filled in.
    pub fn fields(&self) -> Result<PlayerFields, DraftError> {
        required_fields(&self.first_name, &self.last_name, &self.team)
    }

    /// Resets every field. Used after a successful submit, or to cancel.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// ---------------------------------------------------------------------------
// EditPlayerDraft
// ---------------------------------------------------------------------------

/// The "edit player" form.
///
/// Starts with no player selected; [`load`](Self::load) fills it from an
/// existing record, the way clicking "Edit" on a list row does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditPlayerDraft {
    id: Option<PlayerId>,
    pub first_name: String,
    pub last_name: String,
    pub team: String,
}

impl EditPlayerDraft {
    /// A draft pre-filled from `player`.
    pub fn for_player(player: &Player) -> Self {
        let mut draft = Self::default();
        draft.load(player);
        draft
    }

    /// Replaces the draft's contents with `player`'s current values.
    pub fn load(&mut self, player: &Player) {
        self.id = Some(player.id);
        self.first_name = player.first_name.clone();
        self.last_name = player.last_name.clone();
        self.team = player.team.clone();
    }

    /// The player being edited, if one is selected.
    pub fn id(&self) -> Option<PlayerId> {
        self.id
    }

    /// The target id and the fields to submit.
    pub fn target(&self) -> Result<(PlayerId, PlayerFields), DraftError> {
        let id = self.id.ok_or(DraftError::NoPlayerSelected)?;
        let fields =
            required_fields(&self.first_name, &self.last_name, &self.team)?;
        Ok((id, fields))
    }

    /// Deselects the player and resets every field.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
