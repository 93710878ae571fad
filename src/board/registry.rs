use std::collections::HashMap;

use super::{BoardError, PlayerId};

/// Maps player-id to display name. Flips carry only an id, so anything that wants a
/// human-readable name (the renderer's `my`/`up` lines stay id-based, but a future
/// caller might want one) has to go through here.
#[derive(Clone, Debug, Default)]
pub(crate) struct PlayerRegistry {
    names: HashMap<PlayerId, String>,
}

impl PlayerRegistry {
    pub(crate) fn new() -> PlayerRegistry {
        PlayerRegistry { names: HashMap::new() }
    }

    pub(crate) fn contains(&self, id: &PlayerId) -> bool {
        self.names.contains_key(id)
    }

    /// Registers `id` with `display_name`, defaulting to the id itself. A no-op if the
    /// id is already registered; re-registering never overwrites the existing name.
    pub(crate) fn register(&mut self, id: PlayerId, display_name: Option<String>) -> Result<(), BoardError> {
        validate_player_id(id.as_str())?;
        self.names.entry(id.clone()).or_insert_with(|| display_name.unwrap_or_else(|| id.as_str().to_owned()));
        Ok(())
    }

    pub(crate) fn display_name(&self, id: &PlayerId) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }
}

/// Ids must be non-empty and whitespace-free; this is checked both at `register_player`
/// time and implicitly whenever `register` is called from `flip_up` with a fresh id.
pub(crate) fn validate_player_id(id: &str) -> Result<(), BoardError> {
    if id.is_empty() || id.chars().any(char::is_whitespace) {
        return Err(BoardError::InvalidPlayerId(id.to_owned()));
    }
    Ok(())
}
