use std::fmt;

use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::debug;

use crate::{
    config::SprtConfig,
    error::Result,
    game::simulate_one_game,
    moves::Outcome,
    player::Player,
    random_utils::{RandomSource, seeded_rng},
    strategy::Strategy,
};

/// Two-sided normal quantile for a 95% interval
pub const Z_95: f64 = 1.96;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Strategy A wins significantly more often
    #[strum(serialize = "A better")]
    ABetter,
    /// Strategy B wins significantly more often
    #[strum(serialize = "B better")]
    BBetter,
    /// Neither alternative holds
    #[strum(serialize = "no difference")]
    NoDifference,
    /// The game cap was reached before any boundary was crossed
    #[strum(serialize = "inconclusive")]
    Inconclusive,
}

impl Verdict {
    /// The verdict with the roles of A and B swapped
    pub const fn reversed(self) -> Self {
        match self {
            Verdict::ABetter => Verdict::BBetter,
            Verdict::BBetter => Verdict::ABetter,
            Verdict::NoDifference => Verdict::NoDifference,
            Verdict::Inconclusive => Verdict::Inconclusive,
        }
    }
}

/// Decision bounds and per-outcome log likelihood increments, derived once from a config
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SprtBounds {
    pub lower: f64,
    pub upper: f64,
    /// Increments for the "A better" track (p = p0 + delta)
    pub high_win: f64,
    pub high_loss: f64,
    /// Increments for the "B better" track (p = p0 - delta)
    pub low_win: f64,
    pub low_loss: f64,
}

impl SprtBounds {
    pub fn new(config: &SprtConfig) -> Self {
        let (alpha, beta, p0) = (config.alpha, config.beta, config.p0);
        let p_high = config.p_high();
        let p_low = config.p_low();

        Self {
            lower: (beta / (1.0 - alpha)).ln(),
            upper: ((1.0 - beta) / alpha).ln(),
            high_win: (p_high / p0).ln(),
            high_loss: ((1.0 - p_high) / (1.0 - p0)).ln(),
            low_win: (p_low / p0).ln(),
            low_loss: ((1.0 - p_low) / (1.0 - p0)).ln(),
        }
    }
}

/// Accumulates game outcomes (from A's perspective) and tests them against both alternatives
#[derive(Clone, Debug)]
pub struct SprtCalculator {
    bounds: SprtBounds,
    min_non_tie_games: u64,

    wins_a: u64,
    wins_b: u64,
    ties: u64,

    llr_high: f64,
    llr_low: f64,
}

impl SprtCalculator {
    pub fn new(config: &SprtConfig) -> Self {
        Self {
            bounds: SprtBounds::new(config),
            min_non_tie_games: config.min_non_tie_games,
            wins_a: 0,
            wins_b: 0,
            ties: 0,
            llr_high: 0.0,
            llr_low: 0.0,
        }
    }

    pub fn add_outcome(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Win => {
                self.wins_a += 1;
                self.llr_high += self.bounds.high_win;
                self.llr_low += self.bounds.low_win;
            }
            Outcome::Loss => {
                self.wins_b += 1;
                self.llr_high += self.bounds.high_loss;
                self.llr_low += self.bounds.low_loss;
            }
            Outcome::Tie => {
                self.ties += 1;
            }
        }
    }

    pub fn total_games(&self) -> u64 {
        self.wins_a + self.wins_b + self.ties
    }

    pub fn non_tie_games(&self) -> u64 {
        self.wins_a + self.wins_b
    }

    pub fn llr_high(&self) -> f64 {
        self.llr_high
    }

    pub fn llr_low(&self) -> f64 {
        self.llr_low
    }

    pub fn bounds(&self) -> &SprtBounds {
        &self.bounds
    }

    /// `None` while more data is needed
    pub fn decision(&self) -> Option<Verdict> {
        if self.non_tie_games() < self.min_non_tie_games {
            return None;
        }

        if self.llr_high >= self.bounds.upper {
            Some(Verdict::ABetter)
        } else if self.llr_low >= self.bounds.upper {
            Some(Verdict::BBetter)
        } else if self.llr_high <= self.bounds.lower && self.llr_low <= self.bounds.lower {
            Some(Verdict::NoDifference)
        } else {
            None
        }
    }

    fn rate(&self, wins: u64) -> f64 {
        match self.non_tie_games() {
            0 => 0.0,
            n => wins as f64 / n as f64,
        }
    }

    pub fn into_report(
        self,
        strategy_a: Strategy,
        strategy_b: Strategy,
        verdict: Verdict,
    ) -> SprtReport {
        SprtReport {
            strategy_a,
            strategy_b,
            verdict,
            win_rate_a: self.rate(self.wins_a),
            win_rate_b: self.rate(self.wins_b),
            wins_a: self.wins_a,
            wins_b: self.wins_b,
            ties: self.ties,
            total_games: self.total_games(),
            non_tie_games: self.non_tie_games(),
            llr_high: self.llr_high,
            llr_low: self.llr_low,
        }
    }
}

impl fmt::Display for SprtCalculator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Games: {} (A: {}, B: {}, T: {}), LLR high: {:.3} low: {:.3} [{:.3}, {:.3}]",
            self.total_games(),
            self.wins_a,
            self.wins_b,
            self.ties,
            self.llr_high,
            self.llr_low,
            self.bounds.lower,
            self.bounds.upper
        )
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub diff: f64,
    pub margin: f64,
}

impl ConfidenceInterval {
    pub fn lower(&self) -> f64 {
        self.diff - self.margin
    }

    pub fn upper(&self) -> f64 {
        self.diff + self.margin
    }
}

/// Outcome of one pairwise comparison
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SprtReport {
    pub strategy_a: Strategy,
    pub strategy_b: Strategy,
    pub verdict: Verdict,
    /// Share of non-tie games won by A. 0 when every game tied
    pub win_rate_a: f64,
    pub win_rate_b: f64,
    pub wins_a: u64,
    pub wins_b: u64,
    pub ties: u64,
    pub total_games: u64,
    pub non_tie_games: u64,
    pub llr_high: f64,
    pub llr_low: f64,
}

impl SprtReport {
    /// 95% interval for `win_rate_a - win_rate_b`.
    /// Uses A's variance for both arms: `diff ± 1.96 * 2 * sqrt(p(1-p)/n)`.
    pub fn confidence_interval(&self) -> Option<ConfidenceInterval> {
        if self.non_tie_games == 0 {
            return None;
        }

        let p = self.win_rate_a;
        let n = self.non_tie_games as f64;
        Some(ConfidenceInterval {
            diff: self.win_rate_a - self.win_rate_b,
            margin: Z_95 * 2.0 * (p * (1.0 - p) / n).sqrt(),
        })
    }

    /// The same comparison with A and B swapped
    pub fn mirrored(&self) -> Self {
        Self {
            strategy_a: self.strategy_b,
            strategy_b: self.strategy_a,
            verdict: self.verdict.reversed(),
            win_rate_a: self.win_rate_b,
            win_rate_b: self.win_rate_a,
            wins_a: self.wins_b,
            wins_b: self.wins_a,
            ties: self.ties,
            total_games: self.total_games,
            non_tie_games: self.non_tie_games,
            llr_high: self.llr_low,
            llr_low: self.llr_high,
        }
    }
}

impl fmt::Display for SprtReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} vs {}: {} | A {:.2}% B {:.2}% | games: {} non-tie: {} ties: {}",
            self.strategy_a,
            self.strategy_b,
            self.verdict,
            100.0 * self.win_rate_a,
            100.0 * self.win_rate_b,
            self.total_games,
            self.non_tie_games,
            self.ties
        )
    }
}

fn play_until_verdict<RA: RandomSource, RB: RandomSource>(
    strategy_a: Strategy,
    strategy_b: Strategy,
    config: &SprtConfig,
    rng_a: RA,
    rng_b: RB,
) -> SprtReport {
    let mut player_a = Player::with_capacity(rng_a, config.history_capacity);
    let mut player_b = Player::with_capacity(rng_b, config.history_capacity);
    let mut calculator = SprtCalculator::new(config);

    while calculator.total_games() < config.max_games {
        let outcome = simulate_one_game(&mut player_a, strategy_a, &mut player_b, strategy_b);
        calculator.add_outcome(outcome);

        if let Some(verdict) = calculator.decision() {
            debug!(%strategy_a, %strategy_b, %verdict, "{}", calculator);
            return calculator.into_report(strategy_a, strategy_b, verdict);
        }
    }

    debug!(%strategy_a, %strategy_b, "reached game cap. {}", calculator);
    calculator.into_report(strategy_a, strategy_b, Verdict::Inconclusive)
}

/// Runs a sequential test of `strategy_a` against `strategy_b`, each played by a fresh player.
/// The config is validated before the first game.
pub fn run_sprt<RA: RandomSource, RB: RandomSource>(
    strategy_a: Strategy,
    strategy_b: Strategy,
    config: &SprtConfig,
    rng_a: RA,
    rng_b: RB,
) -> Result<SprtReport> {
    config.validate()?;
    Ok(play_until_verdict(strategy_a, strategy_b, config, rng_a, rng_b))
}

/// [`run_sprt`] with two seeded generators
pub fn run_sprt_seeded(
    strategy_a: Strategy,
    strategy_b: Strategy,
    config: &SprtConfig,
    seeds: (u64, u64),
) -> Result<SprtReport> {
    config.validate()?;
    Ok(run_validated_pair(strategy_a, strategy_b, config, seeds))
}

/// Seeded run for callers that have already validated `config`
pub(crate) fn run_validated_pair(
    strategy_a: Strategy,
    strategy_b: Strategy,
    config: &SprtConfig,
    seeds: (u64, u64),
) -> SprtReport {
    play_until_verdict(
        strategy_a,
        strategy_b,
        config,
        seeded_rng(seeds.0),
        seeded_rng(seeds.1),
    )
}
