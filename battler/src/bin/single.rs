use battler::render_report;
use clap::Parser;
use rps_core::{
    config::SprtArgs, logging::init_logging, random_utils::SeedSequence, sprt::run_sprt_seeded,
    strategy::Strategy,
};

#[derive(Parser, Debug)]
#[command(about = "Runs one SPRT comparison between two strategies")]
struct Args {
    #[arg(short = 'a', long)]
    strategy_a: Strategy,
    #[arg(short = 'b', long)]
    strategy_b: Strategy,

    #[command(flatten)]
    sprt: SprtArgs,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let args = Args::parse();

    let config = args.sprt.to_config()?;
    let base_seed = args.sprt.base_seed()?;
    let seeds = SeedSequence::new(base_seed).next_pair();

    let report = run_sprt_seeded(args.strategy_a, args.strategy_b, &config, seeds)?;
    println!("{}", render_report(&report));
    println!("Seed: {}", base_seed);

    Ok(())
}

// cargo run -p battler --bin single -r -- -a frequency-counter -b fixed-mix
// cargo run -p battler --bin single -r -- -a random -b random --delta 0.05 --seed 3
