use common::{
    model::{
        game::Hand,
        match_state::{Match, MatchState},
        player::Player,
        round::Round,
    },
    GameResult,
};
use tokio::sync::oneshot;

pub type Reply<T> = oneshot::Sender<T>;

// Messages handled by a match's own task, one at a time
#[derive(Debug)]
pub enum GameRequest {
    Vote {
        player: Player,
        hand: Hand,
        reply: Reply<GameResult<()>>,
    },
    StartNewRound {
        reply: Reply<GameResult<()>>,
    },
    ComputeWinner {
        reply: Reply<GameResult<Option<Player>>>,
    },
    RoundWinner {
        reply: Reply<Option<Player>>,
    },
    Rounds {
        reply: Reply<Vec<Round>>,
    },
    State {
        reply: Reply<MatchState>,
    },
    Snapshot {
        reply: Reply<Match>,
    },
}
