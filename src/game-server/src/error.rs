use common::{model::id::Id, GameError};
use thiserror::Error;

pub type HostResult<T> = Result<T, HostError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error(transparent)]
    Game(#[from] GameError),

    #[error("match {0} not found")]
    MatchNotFound(Id),

    #[error("match task is no longer running")]
    MatchClosed,

    #[error("game server is shutting down")]
    ShuttingDown,
}
