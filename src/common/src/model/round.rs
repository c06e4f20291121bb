use serde::{Deserialize, Serialize};

use super::{
    game::{winning_vote, Hand, Outcome, Side},
    id::Id,
};

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum RoundState {
    AwaitingVotes,
    Complete,
}

/// One exchange of votes. Votes may be overwritten at any time; the winner is
/// always derived from whatever is currently stored.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Round {
    id: Id,
    player1_vote: Option<Hand>,
    player2_vote: Option<Hand>,
}

impl Round {
    pub(crate) fn new() -> Self {
        Round {
            id: Id::new(),
            player1_vote: None,
            player2_vote: None,
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn player1_vote(&self) -> Option<Hand> {
        self.player1_vote
    }

    pub fn player2_vote(&self) -> Option<Hand> {
        self.player2_vote
    }

    pub fn vote_of(&self, side: Side) -> Option<Hand> {
        match side {
            Side::Player1 => self.player1_vote,
            Side::Player2 => self.player2_vote,
        }
    }

    pub fn set_player1_vote(&mut self, vote: Hand) {
        self.player1_vote = Some(vote);
    }

    pub fn set_player2_vote(&mut self, vote: Hand) {
        self.player2_vote = Some(vote);
    }

    pub fn set_vote(&mut self, side: Side, vote: Hand) {
        match side {
            Side::Player1 => self.set_player1_vote(vote),
            Side::Player2 => self.set_player2_vote(vote),
        }
    }

    /// `None` while a vote is missing or when both sides played the same hand.
    pub fn winner(&self) -> Option<Side> {
        let vote = winning_vote(self.player1_vote, self.player2_vote)?;
        if Some(vote) == self.player1_vote {
            Some(Side::Player1)
        } else {
            Some(Side::Player2)
        }
    }

    pub fn state(&self) -> RoundState {
        match (self.player1_vote, self.player2_vote) {
            (Some(_), Some(_)) => RoundState::Complete,
            _ => RoundState::AwaitingVotes,
        }
    }

    pub fn is_draw(&self) -> bool {
        self.state() == RoundState::Complete && self.winner().is_none()
    }

    /// Result of the round from one side's point of view, once both votes are in.
    pub fn outcome_for(&self, side: Side) -> Option<Outcome> {
        if self.state() != RoundState::Complete {
            return None;
        }
        Some(match self.winner() {
            None => Outcome::Draw,
            Some(winner) if winner == side => Outcome::Win,
            Some(_) => Outcome::Loss,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_round_has_no_votes_and_no_winner() {
        let round = Round::new();
        assert_eq!(round.player1_vote(), None);
        assert_eq!(round.player2_vote(), None);
        assert_eq!(round.winner(), None);
        assert_eq!(round.state(), RoundState::AwaitingVotes);
        assert_eq!(round.outcome_for(Side::Player1), None);
    }

    #[test]
    fn single_vote_has_no_winner() {
        let mut round = Round::new();
        round.set_player1_vote(Hand::Rock);
        assert_eq!(round.winner(), None);
        assert_eq!(round.state(), RoundState::AwaitingVotes);
        assert!(!round.is_draw());
    }

    #[test]
    fn winner_maps_to_side() {
        let mut round = Round::new();
        round.set_player1_vote(Hand::Rock);
        round.set_player2_vote(Hand::Scissors);
        assert_eq!(round.winner(), Some(Side::Player1));
        assert_eq!(round.outcome_for(Side::Player1), Some(Outcome::Win));
        assert_eq!(round.outcome_for(Side::Player2), Some(Outcome::Loss));

        round.set_player2_vote(Hand::Paper);
        assert_eq!(round.winner(), Some(Side::Player2));
    }

    #[test]
    fn overwriting_vote_recomputes_winner() {
        let mut round = Round::new();
        round.set_vote(Side::Player1, Hand::Paper);
        round.set_vote(Side::Player2, Hand::Paper);
        assert!(round.is_draw());
        assert_eq!(round.outcome_for(Side::Player2), Some(Outcome::Draw));

        round.set_vote(Side::Player1, Hand::Scissors);
        assert_eq!(round.winner(), Some(Side::Player1));
        assert_eq!(round.vote_of(Side::Player1), Some(Hand::Scissors));
    }
}
