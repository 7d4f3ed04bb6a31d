use crate::{
    history::{DEFAULT_HISTORY_CAPACITY, RoundHistory},
    moves::{Move, Round},
    random_utils::RandomSource,
    strategy::{MoveCounts, Strategy},
};

/// One participant: a bounded window of recent rounds, lifetime move counts and its own randomness.
pub struct Player<R: RandomSource> {
    history: RoundHistory,
    my_counts: MoveCounts,
    their_counts: MoveCounts,
    rng: R,
}

impl<R: RandomSource> Player<R> {
    pub fn new(rng: R) -> Self {
        Self::with_capacity(rng, DEFAULT_HISTORY_CAPACITY)
    }

    pub fn with_capacity(rng: R, history_capacity: usize) -> Self {
        Self {
            history: RoundHistory::new(history_capacity),
            my_counts: MoveCounts::default(),
            their_counts: MoveCounts::default(),
            rng,
        }
    }

    pub fn add_round(&mut self, round: Round) {
        self.history.push(round);
        self.my_counts.add(round.my_move);
        self.their_counts.add(round.their_move);
    }

    /// Picks a move. Does not record anything.
    pub fn play(&mut self, strategy: Strategy) -> Move {
        strategy.choose_move(&self.history, &self.their_counts, &mut self.rng)
    }

    pub fn history(&self) -> &RoundHistory {
        &self.history
    }

    pub fn nth_last(&self, n: usize) -> Option<&Round> {
        self.history.nth_last(n)
    }

    pub fn rounds_in_order(&self) -> Vec<Round> {
        self.history.rounds_in_order()
    }

    pub fn my_counts(&self) -> &MoveCounts {
        &self.my_counts
    }

    pub fn their_counts(&self) -> &MoveCounts {
        &self.their_counts
    }
}
