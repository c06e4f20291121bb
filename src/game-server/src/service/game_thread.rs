use common::model::{
    game::Hand,
    id::Id,
    match_state::{Match, MatchState},
    player::Player,
    round::Round,
};
use tokio::sync::{
    broadcast,
    mpsc::{Receiver, Sender},
    oneshot,
};
use tracing::{debug, info, warn};

use crate::{
    error::{HostError, HostResult},
    model::internal::{GameRequest, Reply},
};

/// Owns one `Match` and applies requests to it strictly in arrival order.
pub struct GameThread {}
impl GameThread {
    pub async fn run(
        mut game: Match,
        mut shutdown_receiver: broadcast::Receiver<()>,
        mut from_handle: Receiver<GameRequest>,
    ) {
        let id = game.id();
        info!("Hosting match {}", id);
        loop {
            tokio::select! {
                request = from_handle.recv() => {
                    let Some(request) = request else {
                        debug!("All handles to match {} dropped", id);
                        break;
                    };
                    Self::update(&mut game, request);
                }
                _ = shutdown_receiver.recv() => {
                    break;
                }
            }
        }
        info!("Exiting match {}", id);
    }

    fn update(game: &mut Match, request: GameRequest) {
        let before = game.state();
        match request {
            GameRequest::Vote {
                player,
                hand,
                reply,
            } => Self::respond(reply, game.set_player_vote(&player, hand)),
            GameRequest::StartNewRound { reply } => Self::respond(reply, game.start_new_round()),
            GameRequest::ComputeWinner { reply } => {
                Self::respond(reply, game.compute_winner().map(|w| w.cloned()))
            }
            GameRequest::RoundWinner { reply } => {
                Self::respond(reply, game.round_winner().cloned())
            }
            GameRequest::Rounds { reply } => Self::respond(reply, game.rounds().to_vec()),
            GameRequest::State { reply } => Self::respond(reply, game.state()),
            GameRequest::Snapshot { reply } => Self::respond(reply, game.clone()),
        }

        let after = game.state();
        if before != after {
            match after {
                MatchState::Done => info!(
                    "Match {} is done, result: {:?}",
                    game.id(),
                    game.compute_winner().map(|w| w.map(Player::name))
                ),
                // Overwriting a vote in the deciding round can reopen the match
                MatchState::InProgress => info!("Match {} is back in progress", game.id()),
            }
        }
    }

    fn respond<T>(reply: Reply<T>, value: T) {
        if reply.send(value).is_err() {
            warn!("Requester went away before the reply was sent");
        }
    }
}

/// Cloneable client for a hosted match.
#[derive(Debug, Clone)]
pub struct MatchHandle {
    id: Id,
    sender: Sender<GameRequest>,
}

impl MatchHandle {
    pub fn new(id: Id, sender: Sender<GameRequest>) -> Self {
        MatchHandle { id, sender }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> GameRequest,
    ) -> HostResult<T> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(build(reply))
            .await
            .map_err(|_| HostError::MatchClosed)?;
        response.await.map_err(|_| HostError::MatchClosed)
    }

    pub async fn vote(&self, player: &Player, hand: Hand) -> HostResult<()> {
        let player = player.clone();
        Ok(self
            .request(|reply| GameRequest::Vote {
                player,
                hand,
                reply,
            })
            .await??)
    }

    pub async fn start_new_round(&self) -> HostResult<()> {
        Ok(self
            .request(|reply| GameRequest::StartNewRound { reply })
            .await??)
    }

    pub async fn compute_winner(&self) -> HostResult<Option<Player>> {
        Ok(self
            .request(|reply| GameRequest::ComputeWinner { reply })
            .await??)
    }

    pub async fn round_winner(&self) -> HostResult<Option<Player>> {
        self.request(|reply| GameRequest::RoundWinner { reply })
            .await
    }

    pub async fn rounds(&self) -> HostResult<Vec<Round>> {
        self.request(|reply| GameRequest::Rounds { reply }).await
    }

    pub async fn state(&self) -> HostResult<MatchState> {
        self.request(|reply| GameRequest::State { reply }).await
    }

    /// Copy of the match as of the moment the request was handled.
    pub async fn snapshot(&self) -> HostResult<Match> {
        self.request(|reply| GameRequest::Snapshot { reply }).await
    }

    /// Resolves once the match task has stopped.
    pub async fn closed(&self) {
        self.sender.closed().await
    }
}
