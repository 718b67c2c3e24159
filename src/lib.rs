pub mod calendar;
pub mod commands;
pub mod config;
pub mod engine;
pub mod errors;
pub mod indicators;
pub mod irr;
pub mod models;
pub mod param_utils;
pub mod performance;
pub mod price_series;
pub mod report;
pub mod strategy;
pub mod strategy_utils;

pub use config::{IrrSolverSettings, PeakReference, StrategyConfig, ValueAveragingPolicy};
pub use engine::{run_strategies, simulate, try_simulate};
pub use errors::EngineError;
pub use models::{PricePoint, StrategyRun, Trajectory, TrajectoryPoint};
pub use performance::{KeyMetrics, PerformanceCalculator};
pub use report::{MetricKey, MetricValue, MetricsReport, UNAVAILABLE};
pub use strategy::StrategyKind;
