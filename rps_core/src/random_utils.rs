use rand::{Rng, RngCore, SeedableRng, TryRngCore, rngs::OsRng, rngs::StdRng};

use crate::{
    error::{Result, RpsError},
    moves::Move,
};

/// Source of randomness consumed by players
pub trait RandomSource {
    /// Uniform pick among the three moves
    fn pick_move(&mut self) -> Move;
    /// Uniform real in [0, 1)
    fn unit(&mut self) -> f64;
}

impl<R: RngCore> RandomSource for R {
    fn pick_move(&mut self) -> Move {
        Move::from_index(self.random_range(0..Move::COUNT))
    }

    fn unit(&mut self) -> f64 {
        self.random::<f64>()
    }
}

/// Replays fixed cycles of moves and unit draws. Used to drive strategies deterministically.
#[derive(Clone, Debug)]
pub struct ScriptedSource {
    moves: Vec<Move>,
    units: Vec<f64>,
    move_idx: usize,
    unit_idx: usize,
}

impl ScriptedSource {
    pub fn new(moves: Vec<Move>, units: Vec<f64>) -> Self {
        Self {
            moves,
            units,
            move_idx: 0,
            unit_idx: 0,
        }
    }

    pub fn with_moves(moves: Vec<Move>) -> Self {
        Self::new(moves, Vec::new())
    }

    pub fn with_units(units: Vec<f64>) -> Self {
        Self::new(Vec::new(), units)
    }
}

impl RandomSource for ScriptedSource {
    fn pick_move(&mut self) -> Move {
        if self.moves.is_empty() {
            return Move::Rock;
        }
        let res = self.moves[self.move_idx % self.moves.len()];
        self.move_idx += 1;
        res
    }

    fn unit(&mut self) -> f64 {
        if self.units.is_empty() {
            return 0.0;
        }
        let res = self.units[self.unit_idx % self.units.len()];
        self.unit_idx += 1;
        res.clamp(0.0, 1.0 - f64::EPSILON)
    }
}

pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Draws a seed from the operating system. Failure is fatal for a run.
pub fn os_seed() -> Result<u64> {
    OsRng
        .try_next_u64()
        .map_err(|e| RpsError::Entropy(e.to_string()))
}

/// Hands out independent seeds derived from a single base seed
pub struct SeedSequence {
    rng: StdRng,
}

impl SeedSequence {
    pub fn new(base_seed: u64) -> Self {
        Self {
            rng: seeded_rng(base_seed),
        }
    }

    pub fn next_seed(&mut self) -> u64 {
        self.rng.next_u64()
    }

    /// Two distinct seeds, one per agent
    pub fn next_pair(&mut self) -> (u64, u64) {
        let a = self.next_seed();
        let mut b = self.next_seed();
        while b == a {
            b = self.next_seed();
        }
        (a, b)
    }
}
