use std::ops::Not;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[repr(u8)]
#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Debug,
    Default,
    Display,
    Serialize,
    Deserialize,
    EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Move {
    #[default]
    Rock = 0,
    Paper = 1,
    Scissors = 2,
}

impl Move {
    pub const COUNT: usize = 3;
    pub const ALL: [Move; Move::COUNT] = [Move::Rock, Move::Paper, Move::Scissors];

    pub const fn from_index(index: usize) -> Move {
        Self::ALL[index % Self::COUNT]
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    /// The move that defeats `self`
    pub const fn counter(self) -> Move {
        match self {
            Move::Rock => Move::Paper,
            Move::Paper => Move::Scissors,
            Move::Scissors => Move::Rock,
        }
    }

    /// The move that `self` defeats
    pub const fn loses_to(self) -> Move {
        match self {
            Move::Rock => Move::Scissors,
            Move::Paper => Move::Rock,
            Move::Scissors => Move::Paper,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Display, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Loss,
    #[default]
    Tie,
}

/// Swaps perspective: Win <-> Loss, Tie stays
impl Not for Outcome {
    type Output = Outcome;

    fn not(self) -> Self {
        match self {
            Outcome::Win => Outcome::Loss,
            Outcome::Loss => Outcome::Win,
            Outcome::Tie => Outcome::Tie,
        }
    }
}

/// Judges `mine` against `theirs`, from the perspective of `mine`
pub const fn judge(mine: Move, theirs: Move) -> Outcome {
    if mine as u8 == theirs as u8 {
        Outcome::Tie
    } else if mine.loses_to() as u8 == theirs as u8 {
        Outcome::Win
    } else {
        Outcome::Loss
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub struct Round {
    pub my_move: Move,
    pub their_move: Move,
    pub outcome: Outcome,
}

impl Round {
    pub const fn new(my_move: Move, their_move: Move) -> Self {
        Self {
            my_move,
            their_move,
            outcome: judge(my_move, their_move),
        }
    }

    /// The same round, seen by the opponent
    pub fn mirror(&self) -> Self {
        Self {
            my_move: self.their_move,
            their_move: self.my_move,
            outcome: !self.outcome,
        }
    }
}

impl std::fmt::Display for Round {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} vs {}: {}",
            self.my_move, self.their_move, self.outcome
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_judge_known_results() {
        assert_eq!(judge(Move::Paper, Move::Rock), Outcome::Win);
        assert_eq!(judge(Move::Scissors, Move::Paper), Outcome::Win);
        assert_eq!(judge(Move::Rock, Move::Scissors), Outcome::Win);
        assert_eq!(judge(Move::Rock, Move::Paper), Outcome::Loss);
        assert_eq!(judge(Move::Rock, Move::Rock), Outcome::Tie);
    }

    #[test]
    fn test_judge_symmetry() {
        for a in Move::ALL {
            assert_eq!(judge(a, a), Outcome::Tie);
            for b in Move::ALL {
                assert_eq!(judge(a, b), !judge(b, a), "{a} vs {b}");
            }
        }
    }

    #[test]
    fn test_counter_inverse() {
        for m in Move::ALL {
            assert_ne!(m.counter(), m);
            assert_eq!(m.counter().loses_to(), m);
            assert_eq!(judge(m.counter(), m), Outcome::Win);
        }
    }

    #[test]
    fn test_outcome_negation() {
        assert_eq!(!Outcome::Win, Outcome::Loss);
        assert_eq!(!!Outcome::Win, Outcome::Win);
        assert_eq!(!Outcome::Tie, Outcome::Tie);
    }

    #[test]
    fn test_round_mirror() {
        let round = Round::new(Move::Rock, Move::Scissors);
        assert_eq!(round.outcome, Outcome::Win);

        let mirrored = round.mirror();
        assert_eq!(mirrored.my_move, Move::Scissors);
        assert_eq!(mirrored.their_move, Move::Rock);
        assert_eq!(mirrored.outcome, Outcome::Loss);
        assert_eq!(mirrored.mirror(), round);
    }

    #[test]
    fn test_move_from_str() {
        assert_eq!(Move::from_str("rock"), Ok(Move::Rock));
        assert_eq!(Move::from_str("Paper"), Ok(Move::Paper));
        assert!(Move::from_str("lizard").is_err());
        assert_eq!(Move::Scissors.to_string(), "scissors");
    }
}
