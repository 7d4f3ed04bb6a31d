use std::io;

use clap::Parser;
use rps_core::{
    history::DEFAULT_HISTORY_CAPACITY,
    logging::init_logging,
    random_utils::{os_seed, seeded_rng},
    session::Session,
    strategy::Strategy,
};

#[derive(Parser, Debug)]
#[command(about = "Play rock-paper-scissors against a strategy")]
struct Args {
    #[arg(long, default_value_t = Strategy::FrequencyCounter)]
    strategy: Strategy,

    /// Number of recent rounds the opponent remembers
    #[arg(short = 'k', long, default_value_t = DEFAULT_HISTORY_CAPACITY)]
    history: usize,

    #[arg(short = 's', long)]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let args = Args::parse();

    let seed = match args.seed {
        Some(seed) => seed,
        None => os_seed()?,
    };

    let mut session = Session::new(args.strategy, seeded_rng(seed), args.history)?;
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    session.run(stdin.lock(), &mut stdout)?;

    Ok(())
}

// cargo run -p battler --bin play -- --strategy counter-last
