use crate::{
    moves::{Move, Outcome, Round},
    player::Player,
    random_utils::RandomSource,
    strategy::Strategy,
};

/// Records a round into both players' histories, each from its own perspective.
/// Returns the outcome for `player_a`.
pub fn record_round<RA: RandomSource, RB: RandomSource>(
    player_a: &mut Player<RA>,
    move_a: Move,
    player_b: &mut Player<RB>,
    move_b: Move,
) -> Outcome {
    let round_a = Round::new(move_a, move_b);
    let round_b = round_a.mirror();
    debug_assert_eq!(round_b.outcome, !round_a.outcome);

    player_a.add_round(round_a);
    player_b.add_round(round_b);

    round_a.outcome
}

/// Plays one round between two players. Returns the outcome for `player_a`.
pub fn simulate_one_game<RA: RandomSource, RB: RandomSource>(
    player_a: &mut Player<RA>,
    strategy_a: Strategy,
    player_b: &mut Player<RB>,
    strategy_b: Strategy,
) -> Outcome {
    let move_a = player_a.play(strategy_a);
    let move_b = player_b.play(strategy_b);

    record_round(player_a, move_a, player_b, move_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random_utils::{ScriptedSource, seeded_rng};

    #[test]
    fn test_rounds_are_mirrored() {
        let mut a = Player::with_capacity(ScriptedSource::with_moves(vec![Move::Paper]), 3);
        let mut b = Player::with_capacity(ScriptedSource::with_moves(vec![Move::Scissors]), 3);

        let outcome = simulate_one_game(&mut a, Strategy::ConstantRock, &mut b, Strategy::Random);
        assert_eq!(outcome, Outcome::Win);

        let ra = *a.nth_last(0).unwrap();
        let rb = *b.nth_last(0).unwrap();
        assert_eq!(ra, Round::new(Move::Rock, Move::Scissors));
        assert_eq!(rb, ra.mirror());
        assert_eq!(rb.outcome, Outcome::Loss);
    }

    #[test]
    fn test_each_game_advances_both_players() {
        let mut a = Player::with_capacity(seeded_rng(1), 3);
        let mut b = Player::with_capacity(seeded_rng(2), 3);

        for i in 1..=6u64 {
            simulate_one_game(&mut a, Strategy::Random, &mut b, Strategy::FrequencyCounter);
            assert_eq!(a.my_counts().total(), i);
            assert_eq!(b.my_counts().total(), i);
            assert_eq!(a.my_counts(), b.their_counts());
            assert_eq!(a.their_counts(), b.my_counts());
        }
        assert_eq!(a.history().len(), 3);
    }

    #[test]
    fn test_counter_last_beats_constant_rock() {
        let mut a = Player::with_capacity(seeded_rng(3), 3);
        let mut b = Player::with_capacity(seeded_rng(4), 3);

        let (counter_last, constant_rock) = (Strategy::CounterLast, Strategy::ConstantRock);
        simulate_one_game(&mut a, counter_last, &mut b, constant_rock);
        for _ in 0..20 {
            let outcome = simulate_one_game(&mut a, counter_last, &mut b, constant_rock);
            assert_eq!(outcome, Outcome::Win);
        }
    }

    #[test]
    fn test_constant_rock_mirror_always_ties() {
        let mut a = Player::new(seeded_rng(5));
        let mut b = Player::new(seeded_rng(6));
        for _ in 0..10 {
            let rock = Strategy::ConstantRock;
            let outcome = simulate_one_game(&mut a, rock, &mut b, rock);
            assert_eq!(outcome, Outcome::Tie);
        }
    }
}
