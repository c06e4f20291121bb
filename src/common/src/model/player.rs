use serde::{Deserialize, Serialize};

use crate::{error::GameError, model::id::Id, GameResult};

/// Participant identity. The name is the key a match uses to tell players
/// apart; the id is carried along for hosts that route by it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(try_from = "RawPlayer")]
pub struct Player {
    pub id: Id,
    name: String,
}

#[derive(Deserialize)]
struct RawPlayer {
    id: Id,
    name: String,
}

impl TryFrom<RawPlayer> for Player {
    type Error = GameError;

    fn try_from(raw: RawPlayer) -> Result<Self, Self::Error> {
        Player::with_id(raw.id, raw.name)
    }
}

impl Player {
    pub fn new(name: impl Into<String>) -> GameResult<Self> {
        Self::with_id(Id::new(), name)
    }

    pub fn with_id(id: Id, name: impl Into<String>) -> GameResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(GameError::InvalidPlayerName);
        }
        Ok(Player { id, name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_identical(&self, other: &Player) -> bool {
        self.name == other.name
    }
}
