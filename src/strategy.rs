use crate::config::StrategyConfig;
use crate::models::*;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of investment policies the engine can simulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum StrategyKind {
    #[serde(rename = "dca")]
    #[value(name = "dca")]
    StandardDca,
    DoubleDownDca,
    LumpSum,
    SmaMomentum,
    SmaMeanReversion,
    ValueAveraging,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 6] = [
        StrategyKind::StandardDca,
        StrategyKind::DoubleDownDca,
        StrategyKind::LumpSum,
        StrategyKind::SmaMomentum,
        StrategyKind::SmaMeanReversion,
        StrategyKind::ValueAveraging,
    ];

    pub fn id(self) -> &'static str {
        match self {
            StrategyKind::StandardDca => "dca",
            StrategyKind::DoubleDownDca => "double_down_dca",
            StrategyKind::LumpSum => "lump_sum",
            StrategyKind::SmaMomentum => "sma_momentum",
            StrategyKind::SmaMeanReversion => "sma_mean_reversion",
            StrategyKind::ValueAveraging => "value_averaging",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            StrategyKind::StandardDca => "DCA",
            StrategyKind::DoubleDownDca => "Double Down DCA",
            StrategyKind::LumpSum => "Lump Sum",
            StrategyKind::SmaMomentum => "SMA Momentum",
            StrategyKind::SmaMeanReversion => "SMA Mean Reversion",
            StrategyKind::ValueAveraging => "Value Averaging",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            StrategyKind::StandardDca => {
                "Dollar-cost averaging: invest a fixed amount every month regardless of price"
            }
            StrategyKind::DoubleDownDca => {
                "Invest double the amount in months where the price has dropped more than the threshold below its peak"
            }
            StrategyKind::LumpSum => {
                "Invest the whole amount of every monthly contribution at the start date"
            }
            StrategyKind::SmaMomentum => {
                "Invest only when the price is at or above its simple moving average"
            }
            StrategyKind::SmaMeanReversion => {
                "Invest only when the price is at or below its simple moving average"
            }
            StrategyKind::ValueAveraging => {
                "Grow the portfolio along a target path, investing more when behind target and less when ahead"
            }
        }
    }

    /// Run this strategy over `prices`.
    pub fn simulate(self, prices: &[PricePoint], config: &StrategyConfig) -> Trajectory {
        crate::engine::simulate(self, prices, config)
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

pub trait Strategy {
    fn kind(&self) -> StrategyKind;
    /// Shortest series the strategy can produce a trajectory for.
    fn get_min_data_points(&self) -> usize;
    fn decide(&self, context: &DecisionContext<'_>) -> MonthlyDecision;
}

#[path = "strategies/standard_dca.rs"]
pub mod standard_dca;

pub use standard_dca::StandardDcaStrategy;

#[path = "strategies/double_down_dca.rs"]
pub mod double_down_dca;

pub use double_down_dca::DoubleDownDcaStrategy;

#[path = "strategies/lump_sum.rs"]
pub mod lump_sum;

pub use lump_sum::LumpSumStrategy;

#[path = "strategies/sma_momentum.rs"]
pub mod sma_momentum;

pub use sma_momentum::SmaMomentumStrategy;

#[path = "strategies/sma_mean_reversion.rs"]
pub mod sma_mean_reversion;

pub use sma_mean_reversion::SmaMeanReversionStrategy;

#[path = "strategies/value_averaging.rs"]
pub mod value_averaging;

pub use value_averaging::ValueAveragingStrategy;

pub fn create_strategy(
    kind: StrategyKind,
    config: &StrategyConfig,
) -> Box<dyn Strategy + Send + Sync> {
    match kind {
        StrategyKind::StandardDca => Box::new(StandardDcaStrategy::new(config)),
        StrategyKind::DoubleDownDca => Box::new(DoubleDownDcaStrategy::new(config)),
        StrategyKind::LumpSum => Box::new(LumpSumStrategy::new(config)),
        StrategyKind::SmaMomentum => Box::new(SmaMomentumStrategy::new(config)),
        StrategyKind::SmaMeanReversion => Box::new(SmaMeanReversionStrategy::new(config)),
        StrategyKind::ValueAveraging => Box::new(ValueAveragingStrategy::new(config)),
    }
}
