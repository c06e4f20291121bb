use thiserror::Error;

pub type GameResult<T> = Result<T, GameError>;

/// Every way a match operation can be refused. A refused operation leaves the
/// match untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("player should exist")]
    MissingPlayer,

    #[error("players should be different")]
    DuplicatePlayer,

    #[error("player name cannot be blank")]
    InvalidPlayerName,

    #[error("invalid match rules: {0}")]
    InvalidRules(String),

    #[error("match is finished")]
    MatchFinished,

    #[error("player {0} is not in the game")]
    PlayerNotInMatch(String),

    #[error("game is not ended")]
    GameNotEnded,
}
