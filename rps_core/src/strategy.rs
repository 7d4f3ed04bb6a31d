use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{history::RoundHistory, moves::Move, random_utils::RandomSource};

/// Cumulative per-move counters. Never windowed, never decremented.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveCounts([u64; Move::COUNT]);

impl MoveCounts {
    pub fn add(&mut self, m: Move) {
        self.0[m.index()] += 1;
    }

    pub fn get(&self, m: Move) -> u64 {
        self.0[m.index()]
    }

    pub fn total(&self) -> u64 {
        self.0.iter().sum()
    }
}

/// Probabilities of the fixed mix, in Rock, Paper, Scissors order
pub const FIXED_MIX_WEIGHTS: [f64; Move::COUNT] = [0.3, 0.4, 0.3];

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display, Serialize, Deserialize, EnumString)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Uniformly random move
    Random,
    /// Plays whatever beats the opponent's previous move
    CounterLast,
    ConstantRock,
    /// Samples the opponent's lifetime move distribution and counters the sample
    FrequencyCounter,
    /// 30% Rock, 40% Paper, 30% Scissors, ignoring history
    FixedMix,
}

impl Strategy {
    pub const ALL: [Strategy; 5] = [
        Strategy::Random,
        Strategy::CounterLast,
        Strategy::ConstantRock,
        Strategy::FrequencyCounter,
        Strategy::FixedMix,
    ];

    pub fn choose_move(
        self,
        history: &RoundHistory,
        opponent_counts: &MoveCounts,
        rng: &mut impl RandomSource,
    ) -> Move {
        match self {
            Strategy::Random => rng.pick_move(),
            Strategy::CounterLast => match history.last() {
                Some(round) => round.their_move.counter(),
                None => rng.pick_move(),
            },
            Strategy::ConstantRock => Move::Rock,
            Strategy::FrequencyCounter => {
                let total = opponent_counts.total();
                if total == 0 {
                    return rng.pick_move();
                }
                let weights = Move::ALL.map(|m| opponent_counts.get(m) as f64 / total as f64);
                select_by_weights(&weights, rng.unit()).counter()
            }
            Strategy::FixedMix => select_by_weights(&FIXED_MIX_WEIGHTS, rng.unit()),
        }
    }
}

/// Partitions [0, 1) into consecutive intervals sized by `weights` (Rock, Paper, Scissors order)
/// and returns the move whose interval contains `draw`.
fn select_by_weights(weights: &[f64; Move::COUNT], draw: f64) -> Move {
    let mut upper = 0.0;
    for m in Move::ALL {
        upper += weights[m.index()];
        if draw < upper {
            return m;
        }
    }

    // Rounding can leave the cumulative sum a hair under 1
    Move::ALL
        .into_iter()
        .rev()
        .find(|m| weights[m.index()] > 0.0)
        .unwrap_or(Move::Scissors)
}
