use std::path::PathBuf;

use battler::{
    cell_records, render_matrix_json, render_matrix_table, timestamp_string, write_results_to_csv,
};
use clap::Parser;
use rps_core::{
    config::SprtArgs, logging::init_logging, matrix::ComparisonMatrix, strategy::Strategy,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(about = "Runs an SPRT comparison between every pair of strategies")]
struct Args {
    /// Comma separated roster. Defaults to every strategy
    #[arg(long, value_delimiter = ',')]
    strategies: Vec<Strategy>,

    /// Worker threads. 1 runs the pairs sequentially, 0 uses one per CPU
    #[arg(short = 't', long, default_value_t = 1)]
    threads: usize,

    /// Also write one row per cell to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Print the matrix as JSON instead of a table
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    sprt: SprtArgs,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let args = Args::parse();

    let config = args.sprt.to_config()?;
    let base_seed = args.sprt.base_seed()?;
    let strategies = if args.strategies.is_empty() {
        Strategy::ALL.to_vec()
    } else {
        args.strategies.clone()
    };
    let threads = match args.threads {
        0 => num_cpus::get(),
        n => n,
    };

    let started_at = timestamp_string();
    let matrix = ComparisonMatrix::run(&strategies, &config, base_seed, threads)?;

    if args.json {
        println!("{}", render_matrix_json(&matrix)?);
    } else {
        println!("{}", render_matrix_table(&matrix, &started_at));
    }

    if let Some(path) = &args.csv {
        write_results_to_csv(&cell_records(&matrix), path)?;
        info!(path = %path.display(), "wrote results");
    }

    Ok(())
}

// cargo run -p battler --release
// cargo run -p battler -r -- --strategies random,constant-rock --seed 7 -t 0 --csv tmp/matrix.csv
