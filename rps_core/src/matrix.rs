use std::{
    sync::{Arc, Mutex, mpsc},
    thread,
};

use itertools::Itertools;
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    config::SprtConfig,
    error::Result,
    random_utils::SeedSequence,
    sprt::{SprtReport, Verdict, run_validated_pair},
    strategy::Strategy,
};

/// Every (i, j) with i <= j, diagonal included
pub fn all_pairs(size: usize) -> Vec<(usize, usize)> {
    (0..size)
        .combinations_with_replacement(2)
        .map(|pair| (pair[0], pair[1]))
        .collect()
}

#[derive(Clone, Debug)]
struct PairJob {
    row: usize,
    col: usize,
    seeds: (u64, u64),
}

enum WorkerMessage {
    PairResult(usize, usize, SprtReport),
    Done,
}

/// Results of every strategy against every other, one SPRT run per unordered pair.
/// Cell (i, j) is seen from the perspective of `strategies[i]`.
#[derive(Clone, Debug, Serialize)]
pub struct ComparisonMatrix {
    pub strategies: Vec<Strategy>,
    pub config: SprtConfig,
    pub base_seed: u64,
    cells: Vec<Option<SprtReport>>,
}

impl ComparisonMatrix {
    fn empty(strategies: &[Strategy], config: &SprtConfig, base_seed: u64) -> Self {
        let size = strategies.len();
        Self {
            strategies: strategies.to_vec(),
            config: *config,
            base_seed,
            cells: vec![None; size * size],
        }
    }

    /// Runs all pairwise comparisons.
    /// `threads <= 1` runs them one after another on the caller's thread.
    pub fn run(
        strategies: &[Strategy],
        config: &SprtConfig,
        base_seed: u64,
        threads: usize,
    ) -> Result<Self> {
        config.validate()?;
        let mut matrix = Self::empty(strategies, config, base_seed);

        let mut seeds = SeedSequence::new(base_seed);
        let jobs: Vec<PairJob> = all_pairs(strategies.len())
            .into_iter()
            .map(|(row, col)| PairJob {
                row,
                col,
                seeds: seeds.next_pair(),
            })
            .collect();

        info!(
            strategies = strategies.len(),
            pairs = jobs.len(),
            threads,
            base_seed,
            "starting comparison matrix"
        );

        if threads <= 1 {
            for job in jobs {
                let report = matrix.run_job(&job);
                matrix.insert(job.row, job.col, report);
            }
        } else {
            matrix.run_parallel(jobs, threads);
        }

        info!("comparison matrix complete");
        Ok(matrix)
    }

    fn run_job(&self, job: &PairJob) -> SprtReport {
        let report = run_validated_pair(
            self.strategies[job.row],
            self.strategies[job.col],
            &self.config,
            job.seeds,
        );
        info!(
            a = %report.strategy_a,
            b = %report.strategy_b,
            verdict = %report.verdict,
            games = report.total_games,
            "pair finished"
        );
        report
    }

    fn run_parallel(&mut self, mut jobs: Vec<PairJob>, threads: usize) {
        // Workers pop from the back
        jobs.reverse();
        let queue = Arc::new(Mutex::new(jobs));
        let (tx, rx) = mpsc::channel::<WorkerMessage>();

        let mut handles = Vec::with_capacity(threads);
        for _ in 0..threads {
            let tx = tx.clone();
            let queue = Arc::clone(&queue);
            let strategies = self.strategies.clone();
            let config = self.config;

            handles.push(thread::spawn(move || {
                loop {
                    let job = match queue.lock() {
                        Ok(mut queue) => queue.pop(),
                        Err(_) => None,
                    };
                    let Some(job) = job else {
                        break;
                    };

                    let report = run_validated_pair(
                        strategies[job.row],
                        strategies[job.col],
                        &config,
                        job.seeds,
                    );
                    if tx
                        .send(WorkerMessage::PairResult(job.row, job.col, report))
                        .is_err()
                    {
                        break;
                    }
                }
                let _ = tx.send(WorkerMessage::Done);
            }));
        }
        drop(tx);

        let mut done_workers = 0;
        while done_workers < threads {
            match rx.recv() {
                Ok(WorkerMessage::PairResult(row, col, report)) => {
                    info!(
                        a = %report.strategy_a,
                        b = %report.strategy_b,
                        verdict = %report.verdict,
                        games = report.total_games,
                        "pair finished"
                    );
                    self.insert(row, col, report);
                }
                Ok(WorkerMessage::Done) => done_workers += 1,
                Err(_) => break,
            }
        }

        for handle in handles {
            if handle.join().is_err() {
                warn!("comparison worker panicked; some cells are missing");
            }
        }
    }

    /// Stores the result for (row, col) and its mirror at (col, row)
    fn insert(&mut self, row: usize, col: usize, report: SprtReport) {
        let size = self.size();
        if row != col {
            self.cells[col * size + row] = Some(report.mirrored());
        }
        self.cells[row * size + col] = Some(report);
    }

    pub fn size(&self) -> usize {
        self.strategies.len()
    }

    /// `None` when either index is outside the roster or the pair has not been run
    pub fn cell(&self, row: usize, col: usize) -> Option<&SprtReport> {
        let size = self.size();
        if row >= size || col >= size {
            return None;
        }
        self.cells[row * size + col].as_ref()
    }

    /// Row strategy's win rate against the column strategy. `None` when missing or inconclusive.
    pub fn win_rate(&self, row: usize, col: usize) -> Option<f64> {
        self.cell(row, col)
            .filter(|report| report.verdict != Verdict::Inconclusive)
            .map(|report| report.win_rate_a)
    }

    /// Mean of the defined win rates in a row. `None` means no data.
    pub fn row_average(&self, row: usize) -> Option<f64> {
        let rates: Vec<f64> = (0..self.size())
            .filter_map(|col| self.win_rate(row, col))
            .collect();
        if rates.is_empty() {
            None
        } else {
            Some(rates.iter().sum::<f64>() / rates.len() as f64)
        }
    }

    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }
}
