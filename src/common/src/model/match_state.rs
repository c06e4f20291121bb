use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{error::GameError, GameResult};

use super::{
    game::{Hand, Side},
    id::Id,
    player::Player,
    round::Round,
};

/// Length of a match. A side needs a strict majority of `max_rounds` round
/// wins to take the match.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
#[serde(try_from = "RawMatchRules")]
pub struct MatchRules {
    max_rounds: u32,
}

#[derive(Deserialize)]
struct RawMatchRules {
    max_rounds: u32,
}

impl TryFrom<RawMatchRules> for MatchRules {
    type Error = GameError;

    fn try_from(raw: RawMatchRules) -> Result<Self, Self::Error> {
        MatchRules::new(raw.max_rounds)
    }
}

impl MatchRules {
    pub const DEFAULT_MAX_ROUNDS: u32 = 5;

    pub fn new(max_rounds: u32) -> GameResult<Self> {
        if max_rounds == 0 {
            return Err(GameError::InvalidRules(
                "a match needs at least one round".to_owned(),
            ));
        }
        Ok(MatchRules { max_rounds })
    }

    pub fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    pub fn must_win(&self) -> u32 {
        self.max_rounds / 2 + 1
    }
}

impl Default for MatchRules {
    fn default() -> Self {
        MatchRules {
            max_rounds: Self::DEFAULT_MAX_ROUNDS,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum MatchState {
    InProgress,
    Done,
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct MatchScore {
    pub player1_wins: u32,
    pub player2_wins: u32,
    pub draws: u32,
    pub rounds_played: u32,
}

impl MatchScore {
    pub fn wins_of(&self, side: Side) -> u32 {
        match side {
            Side::Player1 => self.player1_wins,
            Side::Player2 => self.player2_wins,
        }
    }
}

/// Aggregate root of a best-of-N match.
///
/// Round 1 is opened on creation and rounds are only ever appended. Nothing
/// about progress is stored: state, score and result are all recomputed from
/// the round history on demand.
#[derive(Serialize, Debug, Clone)]
pub struct Match {
    id: Id,
    player1: Player,
    player2: Player,
    rules: MatchRules,
    rounds: Vec<Round>,
}

impl Match {
    /// Best-of-five match between two distinct players.
    pub fn create(
        player1: impl Into<Option<Player>>,
        player2: impl Into<Option<Player>>,
    ) -> GameResult<Self> {
        Self::create_with_rules(player1, player2, MatchRules::default())
    }

    pub fn create_with_rules(
        player1: impl Into<Option<Player>>,
        player2: impl Into<Option<Player>>,
        rules: MatchRules,
    ) -> GameResult<Self> {
        let (Some(player1), Some(player2)) = (player1.into(), player2.into()) else {
            warn!("Refused to create a match with a missing player");
            return Err(GameError::MissingPlayer);
        };
        if player1.is_identical(&player2) {
            warn!("Refused to create a match of {} against itself", player1.name());
            return Err(GameError::DuplicatePlayer);
        }

        let mut game = Match {
            id: Id::new(),
            player1,
            player2,
            rules,
            rounds: Vec::new(),
        };
        game.rounds.push(Round::new());
        info!(
            "Created match {} between {} and {}",
            game.id,
            game.player1.name(),
            game.player2.name()
        );
        Ok(game)
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn player1(&self) -> &Player {
        &self.player1
    }

    pub fn player2(&self) -> &Player {
        &self.player2
    }

    pub fn player(&self, side: Side) -> &Player {
        match side {
            Side::Player1 => &self.player1,
            Side::Player2 => &self.player2,
        }
    }

    pub fn rules(&self) -> MatchRules {
        self.rules
    }

    /// Played rounds in order, the last one being the current round.
    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn current_round(&self) -> &Round {
        // Never empty: round 1 is pushed in the constructor.
        &self.rounds[self.rounds.len() - 1]
    }

    fn current_round_mut(&mut self) -> &mut Round {
        let last = self.rounds.len() - 1;
        &mut self.rounds[last]
    }

    pub fn side_of(&self, player: &Player) -> Option<Side> {
        if self.player1.is_identical(player) {
            Some(Side::Player1)
        } else if self.player2.is_identical(player) {
            Some(Side::Player2)
        } else {
            None
        }
    }

    pub fn start_new_round(&mut self) -> GameResult<()> {
        if self.is_finished() {
            warn!("Match {} is finished, not starting another round", self.id);
            return Err(GameError::MatchFinished);
        }
        self.rounds.push(Round::new());
        debug!("Match {} started round {}", self.id, self.rounds.len());
        Ok(())
    }

    pub fn set_player_vote(&mut self, player: &Player, vote: Hand) -> GameResult<()> {
        let Some(side) = self.side_of(player) else {
            warn!("Player {} is not in match {}", player.name(), self.id);
            return Err(GameError::PlayerNotInMatch(player.name().to_owned()));
        };
        debug!(
            "Match {} round {}: {:?} voted {:?}",
            self.id,
            self.rounds.len(),
            side,
            vote
        );
        self.current_round_mut().set_vote(side, vote);
        Ok(())
    }

    /// Match result: `Ok(Some(_))` for a winner, `Ok(None)` for a drawn match.
    pub fn compute_winner(&self) -> GameResult<Option<&Player>> {
        let score = self.score();
        let must_win = self.rules.must_win();
        if score.rounds_played < must_win {
            return Err(GameError::GameNotEnded);
        }
        if score.player1_wins >= must_win {
            return Ok(Some(&self.player1));
        }
        if score.player2_wins >= must_win {
            return Ok(Some(&self.player2));
        }
        if score.player1_wins == score.player2_wins
            && score.rounds_played >= self.rules.max_rounds()
        {
            return Ok(None);
        }
        Err(GameError::GameNotEnded)
    }

    /// Winner of the current round only.
    pub fn round_winner(&self) -> Option<&Player> {
        self.current_round()
            .winner()
            .map(|side| self.player(side))
    }

    pub fn score(&self) -> MatchScore {
        self.rounds
            .iter()
            .fold(MatchScore::default(), |mut score, round| {
                match round.winner() {
                    Some(Side::Player1) => score.player1_wins += 1,
                    Some(Side::Player2) => score.player2_wins += 1,
                    None if round.is_draw() => score.draws += 1,
                    None => {}
                }
                score.rounds_played += 1;
                score
            })
    }

    pub fn wins_of(&self, side: Side) -> u32 {
        self.score().wins_of(side)
    }

    pub fn state(&self) -> MatchState {
        let score = self.score();
        let must_win = self.rules.must_win();
        if score.player1_wins >= must_win
            || score.player2_wins >= must_win
            || score.rounds_played >= self.rules.max_rounds()
        {
            MatchState::Done
        } else {
            MatchState::InProgress
        }
    }

    pub fn is_finished(&self) -> bool {
        self.state() == MatchState::Done
    }
}
