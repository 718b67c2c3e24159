use crate::config::StrategyConfig;
use crate::engine::run_strategies;
use crate::models::StrategyRun;
use crate::price_series::load_prices;
use crate::report::MetricKey;
use crate::strategy::StrategyKind;
use anyhow::{Context, Result};
use clap::ValueEnum;
use log::{info, warn};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Clone)]
pub struct SimulateOptions {
    pub prices_path: PathBuf,
    pub kinds: Vec<StrategyKind>,
    pub config: StrategyConfig,
    pub output: Option<PathBuf>,
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct SimulationExport<'a> {
    config: &'a StrategyConfig,
    runs: &'a [StrategyRun],
}

pub fn run(options: &SimulateOptions) -> Result<Vec<StrategyRun>> {
    let prices = load_prices(&options.prices_path)?;
    if prices.is_empty() {
        warn!(
            "No usable prices in {}; every metric will be unavailable",
            options.prices_path.display()
        );
    }

    let kinds = if options.kinds.is_empty() {
        StrategyKind::ALL.to_vec()
    } else {
        options.kinds.clone()
    };

    let runs = run_strategies(&prices, &options.config, &kinds);

    match options.format {
        OutputFormat::Table => print!("{}", render_metrics_table(&runs)),
        OutputFormat::Json => {
            let reports: Vec<_> = runs
                .iter()
                .map(|run| serde_json::json!({ "strategy": run.kind, "metrics": run.report }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
    }

    if let Some(path) = &options.output {
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {:?}", path))?;
        let export = SimulationExport {
            config: &options.config,
            runs: &runs,
        };
        serde_json::to_writer_pretty(BufWriter::new(file), &export)
            .with_context(|| format!("Failed to write trajectories to {:?}", path))?;
        info!("Trajectories written to {}", path.display());
    }

    Ok(runs)
}

/// Metrics comparison table, one row per strategy in run order.
pub fn render_metrics_table(runs: &[StrategyRun]) -> String {
    let mut header = vec!["Strategy".to_string()];
    header.extend(MetricKey::ALL.iter().map(|key| key.label().to_string()));

    let rows: Vec<Vec<String>> = runs
        .iter()
        .map(|run| {
            let mut row = vec![run.kind.display_name().to_string()];
            row.extend(run.report.entries().map(|(_, value)| value.to_string()));
            row
        })
        .collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|column| {
            std::iter::once(&header)
                .chain(rows.iter())
                .map(|row| row[column].chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    for row in std::iter::once(&header).chain(rows.iter()) {
        let cells: Vec<String> = row
            .iter()
            .zip(widths.iter())
            .enumerate()
            .map(|(column, (cell, width))| {
                let padding = width - cell.chars().count();
                if column == 0 {
                    format!("{}{}", cell, " ".repeat(padding))
                } else {
                    format!("{}{}", " ".repeat(padding), cell)
                }
            })
            .collect();
        out.push_str(cells.join("  ").trim_end());
        out.push('\n');
    }
    out
}
