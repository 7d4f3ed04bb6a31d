use crate::moves::Round;

pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// Fixed capacity ring buffer holding the most recent rounds.
/// Storage is allocated once; appends overwrite the oldest slot.
#[derive(Clone, Debug)]
pub struct RoundHistory {
    rounds: Box<[Round]>,
    cursor: usize,
    count: usize,
}

impl RoundHistory {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "History capacity must be positive");

        Self {
            rounds: vec![Round::default(); capacity].into_boxed_slice(),
            cursor: 0,
            count: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.rounds.len()
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn push(&mut self, round: Round) {
        self.rounds[self.cursor] = round;
        self.cursor = (self.cursor + 1) % self.capacity();
        if self.count < self.capacity() {
            self.count += 1;
        }
    }

    /// `nth_last(0)` is the most recent round
    pub fn nth_last(&self, n: usize) -> Option<&Round> {
        if n >= self.count {
            return None;
        }

        let capacity = self.capacity();
        let idx = (self.cursor + capacity - 1 - n) % capacity;
        Some(&self.rounds[idx])
    }

    pub fn last(&self) -> Option<&Round> {
        self.nth_last(0)
    }

    /// Snapshot of the stored rounds, oldest first
    pub fn rounds_in_order(&self) -> Vec<Round> {
        (0..self.count)
            .rev()
            .filter_map(|n| self.nth_last(n).copied())
            .collect()
    }
}

impl Default for RoundHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
