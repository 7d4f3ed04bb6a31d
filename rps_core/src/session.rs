use std::{
    fmt,
    io::{BufRead, Write},
    str::FromStr,
};

use serde::Serialize;
use tracing::debug;

use crate::{
    error::{Result, RpsError},
    moves::{Move, Outcome, Round},
    player::Player,
    random_utils::RandomSource,
    strategy::Strategy,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Quit,
    Throw(Move),
}

impl FromStr for Command {
    type Err = RpsError;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        let (Some(c), None) = (chars.next(), chars.next()) else {
            return Err(RpsError::InvalidCommand(s.to_owned()));
        };

        match c.to_ascii_lowercase() {
            'q' => Ok(Command::Quit),
            'r' => Ok(Command::Throw(Move::Rock)),
            'p' => Ok(Command::Throw(Move::Paper)),
            's' => Ok(Command::Throw(Move::Scissors)),
            _ => Err(RpsError::InvalidCommand(s.to_owned())),
        }
    }
}

/// Tally from the human's perspective
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub games: u64,
    pub wins: u64,
    pub losses: u64,
    pub ties: u64,
}

impl SessionSummary {
    fn record(&mut self, outcome: Outcome) {
        self.games += 1;
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Loss => self.losses += 1,
            Outcome::Tie => self.ties += 1,
        }
    }

    fn percent(&self, count: u64) -> f64 {
        match self.games {
            0 => 0.0,
            games => 100.0 * count as f64 / games as f64,
        }
    }

    pub fn win_percent(&self) -> f64 {
        self.percent(self.wins)
    }

    pub fn tie_percent(&self) -> f64 {
        self.percent(self.ties)
    }

    pub fn loss_percent(&self) -> f64 {
        self.percent(self.losses)
    }
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Games: {} | Won: {:.1}% | Tied: {:.1}% | Lost: {:.1}%",
            self.games,
            self.win_percent(),
            self.tie_percent(),
            self.loss_percent()
        )
    }
}

/// A human against one strategy-driven player
pub struct Session<R: RandomSource> {
    opponent: Player<R>,
    strategy: Strategy,
    summary: SessionSummary,
}

impl<R: RandomSource> Session<R> {
    pub fn new(strategy: Strategy, rng: R, history_capacity: usize) -> Result<Self> {
        if history_capacity == 0 {
            return Err(RpsError::InvalidConfig(
                "history capacity must be positive".to_owned(),
            ));
        }

        Ok(Self {
            opponent: Player::with_capacity(rng, history_capacity),
            strategy,
            summary: SessionSummary::default(),
        })
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn summary(&self) -> SessionSummary {
        self.summary
    }

    /// Plays one round. The returned round is from the human's perspective.
    pub fn throw(&mut self, human_move: Move) -> Round {
        let opponent_move = self.opponent.play(self.strategy);
        let opponent_round = Round::new(opponent_move, human_move);
        self.opponent.add_round(opponent_round);

        let round = opponent_round.mirror();
        self.summary.record(round.outcome);
        debug!(%round, "session round");
        round
    }

    /// Reads commands until quit or end of input, then prints and returns the summary
    pub fn run<I: BufRead, W: Write>(
        &mut self,
        mut input: I,
        output: &mut W,
    ) -> Result<SessionSummary> {
        writeln!(
            output,
            "Playing against {}. Enter R, P or S. Q quits.",
            self.strategy
        )?;

        let mut line = String::new();
        loop {
            write!(output, "> ")?;
            output.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                break;
            }

            match line.trim().parse::<Command>() {
                Ok(Command::Quit) => break,
                Ok(Command::Throw(human_move)) => {
                    let round = self.throw(human_move);
                    let result = match round.outcome {
                        Outcome::Win => "You win",
                        Outcome::Loss => "You lose",
                        Outcome::Tie => "Tie",
                    };
                    writeln!(
                        output,
                        "You: {} | Opponent: {} | {}",
                        round.my_move, round.their_move, result
                    )?;
                }
                Err(e) => {
                    writeln!(output, "{e}")?;
                }
            }
        }

        writeln!(output, "{}", self.summary)?;
        Ok(self.summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random_utils::ScriptedSource;
    use std::io::Cursor;

    fn rock_session() -> Session<ScriptedSource> {
        let rng = ScriptedSource::with_moves(vec![]);
        Session::new(Strategy::ConstantRock, rng, 3).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!("q".parse::<Command>().unwrap(), Command::Quit);
        assert_eq!("Q".parse::<Command>().unwrap(), Command::Quit);
        assert_eq!("r".parse::<Command>().unwrap(), Command::Throw(Move::Rock));
        assert_eq!("P".parse::<Command>().unwrap(), Command::Throw(Move::Paper));
        assert_eq!(
            "s".parse::<Command>().unwrap(),
            Command::Throw(Move::Scissors)
        );

        for bad in ["", "rr", "rock", "x", "1"] {
            let parsed = bad.parse::<Command>();
            assert!(matches!(parsed, Err(RpsError::InvalidCommand(_))), "{bad}");
        }
    }

    #[test]
    fn test_throw_against_constant_rock() {
        let mut session = rock_session();
        assert_eq!(session.throw(Move::Paper).outcome, Outcome::Win);
        assert_eq!(session.throw(Move::Rock).outcome, Outcome::Tie);
        assert_eq!(session.throw(Move::Scissors).outcome, Outcome::Loss);

        let summary = session.summary();
        assert_eq!(summary.games, 3);
        assert_eq!((summary.wins, summary.ties, summary.losses), (1, 1, 1));
    }

    #[test]
    fn test_run_rejects_bad_input_and_quits() {
        let mut session = rock_session();
        let input = Cursor::new("p\nhello\nr\nP\nq\ns\n");
        let mut output = Vec::new();

        let summary = session.run(input, &mut output).unwrap();
        assert_eq!(summary.games, 3);
        assert_eq!(summary.wins, 2);
        assert_eq!(summary.ties, 1);

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("unrecognised command"));
        assert!(text.contains("Won: 66.7%"));
        assert!(text.contains("Tied: 33.3%"));
    }

    #[test]
    fn test_run_until_end_of_input() {
        let mut session = rock_session();
        let mut output = Vec::new();
        let summary = session.run(Cursor::new(""), &mut output).unwrap();

        assert_eq!(summary, SessionSummary::default());
        assert_eq!(summary.win_percent(), 0.0);
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Games: 0"));
    }

    #[test]
    fn test_opponent_learns_from_human() {
        let mut session = Session::new(
            Strategy::CounterLast,
            ScriptedSource::with_moves(vec![Move::Rock]),
            3,
        )
        .unwrap();
        session.throw(Move::Scissors);
        // Opponent now counters Scissors with Rock
        assert_eq!(session.throw(Move::Paper).outcome, Outcome::Win);
        assert_eq!(session.throw(Move::Paper).outcome, Outcome::Loss);
    }

    #[test]
    fn test_zero_history_is_rejected() {
        let rng = ScriptedSource::with_moves(vec![]);
        let session = Session::new(Strategy::CounterLast, rng, 0);
        assert!(matches!(session, Err(RpsError::InvalidConfig(_))));
    }
}
