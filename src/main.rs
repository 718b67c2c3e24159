use anyhow::Result;
use clap::{Parser, Subcommand};
use dca_engine::{
    commands::{
        list_strategies,
        simulate::{self, OutputFormat, SimulateOptions},
    },
    config::StrategyConfig,
    strategy::StrategyKind,
};
use log::info;
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dca-engine")]
#[command(about = "Backtest monthly investment strategies against daily close prices")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate strategies over a price file and print their key metrics
    Simulate {
        /// CSV (date,close) or JSON price file
        #[arg(long, value_name = "PATH")]
        prices: PathBuf,
        /// Strategies to run, in display order (defaults to all)
        #[arg(short, long = "strategy", value_enum)]
        strategies: Vec<StrategyKind>,
        /// Monthly contribution
        #[arg(long)]
        contribution: Option<f64>,
        /// Double-down drop threshold as a fraction of the peak (0..1)
        #[arg(long)]
        threshold: Option<f64>,
        /// SMA window in trading days
        #[arg(long)]
        sma_period: Option<usize>,
        /// Value averaging monthly growth rate
        #[arg(long)]
        growth_rate: Option<f64>,
        /// Trailing window in trading days for the double-down peak (0 = all-time high)
        #[arg(long)]
        peak_window: Option<usize>,
        /// Let value averaging sell when the portfolio is ahead of target
        #[arg(long)]
        allow_withdrawal: bool,
        /// Write trajectories and reports as JSON to this file
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
        /// Stdout format for the metrics
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// List available strategies
    Strategies,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            prices,
            strategies,
            contribution,
            threshold,
            sma_period,
            growth_rate,
            peak_window,
            allow_withdrawal,
            output,
            format,
        } => {
            let mut parameters = HashMap::new();
            let trading_days = |days: Option<usize>| days.map(|days| days as f64);
            for (key, value) in [
                ("monthlyContribution", contribution),
                ("drawdownThreshold", threshold),
                ("smaPeriod", trading_days(sma_period)),
                ("growthRate", growth_rate),
                ("peakWindow", trading_days(peak_window)),
            ] {
                if let Some(value) = value {
                    parameters.insert(key.to_string(), value);
                }
            }
            if allow_withdrawal {
                parameters.insert("allowWithdrawal".to_string(), 1.0);
            }

            let config = StrategyConfig::from_env()?.with_parameters(&parameters);
            config.validate()?;
            info!("Simulating with {:?}", config);

            let options = SimulateOptions {
                prices_path: prices,
                kinds: strategies,
                config,
                output,
                format,
            };
            simulate::run(&options)?;
        }
        Commands::Strategies => {
            list_strategies::run()?;
        }
    }

    Ok(())
}
