use std::path::Path;

use chrono::Utc;
use colored::{ColoredString, Colorize};
use csv::Writer;
use rps_core::{
    matrix::ComparisonMatrix,
    sprt::{SprtReport, Verdict},
};
use serde::Serialize;

const NAME_WIDTH: usize = 18;
const CELL_WIDTH: usize = 12;

pub fn timestamp_string() -> String {
    Utc::now().format("%Y-%m-%d_%H-%M-%S").to_string()
}

/// One ordered cell of a comparison matrix, flattened for CSV output
#[derive(Clone, Debug, Serialize)]
pub struct CellRecord {
    pub row: String,
    pub col: String,
    pub verdict: Verdict,
    pub win_rate: Option<f64>,
    pub row_wins: u64,
    pub col_wins: u64,
    pub ties: u64,
    pub total_games: u64,
    pub non_tie_games: u64,
    pub ci_lower: Option<f64>,
    pub ci_upper: Option<f64>,
}

impl CellRecord {
    pub fn new(report: &SprtReport, win_rate: Option<f64>) -> Self {
        let ci = report.confidence_interval();
        Self {
            row: report.strategy_a.to_string(),
            col: report.strategy_b.to_string(),
            verdict: report.verdict,
            win_rate,
            row_wins: report.wins_a,
            col_wins: report.wins_b,
            ties: report.ties,
            total_games: report.total_games,
            non_tie_games: report.non_tie_games,
            ci_lower: ci.map(|ci| ci.lower()),
            ci_upper: ci.map(|ci| ci.upper()),
        }
    }
}

pub fn cell_records(matrix: &ComparisonMatrix) -> Vec<CellRecord> {
    let mut records = Vec::new();
    for row in 0..matrix.size() {
        for col in 0..matrix.size() {
            if let Some(report) = matrix.cell(row, col) {
                records.push(CellRecord::new(report, matrix.win_rate(row, col)));
            }
        }
    }
    records
}

pub fn write_results_to_csv(
    records: &[CellRecord],
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut wtr = Writer::from_path(path)?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// The whole matrix, config and seed included, as pretty-printed JSON
pub fn render_matrix_json(matrix: &ComparisonMatrix) -> serde_json::Result<String> {
    serde_json::to_string_pretty(matrix)
}

fn paint_cell(text: String, verdict: Verdict) -> ColoredString {
    match verdict {
        Verdict::ABetter => text.as_str().green(),
        Verdict::BBetter => text.as_str().red(),
        Verdict::NoDifference => text.as_str().normal(),
        Verdict::Inconclusive => text.as_str().yellow(),
    }
}

fn format_rate(rate: Option<f64>) -> String {
    match rate {
        Some(rate) => format!("{:.1}%", 100.0 * rate),
        None => "n/a".to_owned(),
    }
}

/// Row strategy's win rate against each column, coloured by verdict, plus the row average
pub fn render_matrix_table(matrix: &ComparisonMatrix, started_at: &str) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "Strategy comparison ({}) | alpha: {} beta: {} delta: {} cap: {} | seed: {}",
        started_at,
        matrix.config.alpha,
        matrix.config.beta,
        matrix.config.delta,
        matrix.config.max_games,
        matrix.base_seed
    ));

    let mut header = format!("{:<NAME_WIDTH$}", "");
    for strategy in &matrix.strategies {
        header.push_str(&format!("{:>NAME_WIDTH$}", strategy.to_string()));
    }
    header.push_str(&format!("{:>CELL_WIDTH$}", "average"));
    lines.push(header.as_str().bold().to_string());

    for row in 0..matrix.size() {
        let name = format!("{:<NAME_WIDTH$}", matrix.strategies[row].to_string());
        let mut line = name.as_str().bold().to_string();
        for col in 0..matrix.size() {
            let text = format!("{:>NAME_WIDTH$}", format_rate(matrix.win_rate(row, col)));
            let cell = match matrix.cell(row, col) {
                Some(report) => paint_cell(text, report.verdict).to_string(),
                None => text,
            };
            line.push_str(&cell);
        }
        line.push_str(&format!(
            "{:>CELL_WIDTH$}",
            format_rate(matrix.row_average(row))
        ));
        lines.push(line);
    }

    lines.push(format!(
        "{} row better | {} column better | {} no difference | {} inconclusive",
        "green".green(),
        "red".red(),
        "plain",
        "yellow".yellow()
    ));

    lines.join("\n")
}

/// Multi-line description of a single comparison
pub fn render_report(report: &SprtReport) -> String {
    let verdict = paint_cell(report.verdict.to_string(), report.verdict);
    let mut lines = vec![
        format!("{} vs {}", report.strategy_a, report.strategy_b)
            .as_str()
            .bold()
            .to_string(),
        format!("Verdict: {}", verdict),
        format!(
            "Win rate: {} {:.2}% | {} {:.2}%",
            report.strategy_a,
            100.0 * report.win_rate_a,
            report.strategy_b,
            100.0 * report.win_rate_b
        ),
        format!(
            "Games: {} | Non-tie: {} | Ties: {}",
            report.total_games, report.non_tie_games, report.ties
        ),
        format!("LLR: high {:.4} low {:.4}", report.llr_high, report.llr_low),
    ];

    match report.confidence_interval() {
        Some(ci) => lines.push(format!(
            "Difference: {:.2}% (95% CI {:.2}% to {:.2}%)",
            100.0 * ci.diff,
            100.0 * ci.lower(),
            100.0 * ci.upper()
        )),
        None => lines.push("Difference: n/a (no decisive games)".to_owned()),
    }

    lines.join("\n")
}
