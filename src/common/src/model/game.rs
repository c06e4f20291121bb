use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Loss,
    Draw,
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Hand {
    Rock,
    Paper,
    Scissors,
}
impl Hand {
    pub const ALL: [Hand; 3] = [Hand::Rock, Hand::Paper, Hand::Scissors];

    /// `None` on a draw, otherwise whether `self` wins against `other`.
    pub fn beats(&self, other: &Hand) -> Option<bool> {
        if self == other {
            None
        } else {
            Some(matches!(
                (self, other),
                (Hand::Rock, Hand::Scissors)
                    | (Hand::Scissors, Hand::Paper)
                    | (Hand::Paper, Hand::Rock)
            ))
        }
    }
}

/// Seat a player occupies in a match.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Side {
    Player1,
    Player2,
}
impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Player1 => Side::Player2,
            Side::Player2 => Side::Player1,
        }
    }
}

/// Resolves a pair of votes to the winning hand. An unset vote (`None`) never
/// wins, so a round missing either vote has no winner.
pub fn winning_vote(vote_a: Option<Hand>, vote_b: Option<Hand>) -> Option<Hand> {
    let (a, b) = (vote_a?, vote_b?);
    match a.beats(&b)? {
        true => Some(a),
        false => Some(b),
    }
}
