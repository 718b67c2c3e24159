use crate::calendar;
use crate::config::StrategyConfig;
use crate::errors::EngineError;
use crate::models::*;
use crate::performance::PerformanceCalculator;
use crate::strategy::{create_strategy, Strategy, StrategyKind};
use crate::strategy_utils::tradable_amount;
use log::{debug, info, warn};
use rayon::prelude::*;

/// Running holdings of a single simulation.
#[derive(Debug, Clone, Copy, Default)]
struct Holdings {
    shares_total: f64,
    invested_total: f64,
}

impl Holdings {
    fn buy(&mut self, amount: f64, close: f64) {
        let Some(amount) = tradable_amount(amount) else {
            return;
        };
        self.shares_total += amount / close;
        self.invested_total += amount;
    }

    /// Sells up to `amount` worth of shares; withdrawn cash reduces the net
    /// amount invested.
    fn sell(&mut self, amount: f64, close: f64) {
        let Some(amount) = tradable_amount(amount) else {
            return;
        };
        let shares_sold = (amount / close).min(self.shares_total);
        self.shares_total = (self.shares_total - shares_sold).max(0.0);
        self.invested_total -= shares_sold * close;
    }
}

/// Simulate `kind` over `prices`. Insufficient data yields an empty trajectory.
pub fn simulate(kind: StrategyKind, prices: &[PricePoint], config: &StrategyConfig) -> Trajectory {
    match try_simulate(kind, prices, config) {
        Ok(trajectory) => trajectory,
        Err(err) => {
            warn!("{}: {}", kind.display_name(), err);
            Trajectory::empty()
        }
    }
}

pub fn try_simulate(
    kind: StrategyKind,
    prices: &[PricePoint],
    config: &StrategyConfig,
) -> Result<Trajectory, EngineError> {
    let strategy = create_strategy(kind, config);
    run_strategy(strategy.as_ref(), prices)
}

/// Drive any [`Strategy`] over a price series, consulting it on each decision
/// day and valuing holdings at every close.
pub fn run_strategy(
    strategy: &dyn Strategy,
    prices: &[PricePoint],
) -> Result<Trajectory, EngineError> {
    let kind = strategy.kind();
    let required = strategy.get_min_data_points().max(1);
    if prices.len() < required {
        return Err(EngineError::InsufficientData {
            kind,
            required,
            available: prices.len(),
        });
    }
    if let Some(index) = prices
        .windows(2)
        .position(|pair| pair[1].date <= pair[0].date)
    {
        return Err(EngineError::UnorderedSeries { index: index + 1 });
    }

    let closes: Vec<f64> = prices.iter().map(|p| p.close).collect();
    let decision_days = calendar::decision_day_indices(prices, |p| p.date);
    let total_months = decision_days.len();

    let mut holdings = Holdings::default();
    let mut points = Vec::with_capacity(prices.len());
    let mut next_decision = decision_days.iter().copied().enumerate().peekable();

    for (index, price) in prices.iter().enumerate() {
        let close = price.close;

        if let Some((month_index, _)) = next_decision.next_if(|(_, day)| *day == index) {
            if close.is_finite() && close > 0.0 {
                let context = DecisionContext {
                    date: price.date,
                    index,
                    close,
                    history: &closes[..=index],
                    month_ordinal: month_index + 1,
                    total_months,
                    shares_total: holdings.shares_total,
                };
                let decision = strategy.decide(&context);
                debug!(
                    "{} {}: {:?} {:.2} at {:.2}",
                    kind.id(),
                    price.date,
                    decision.action,
                    decision.amount,
                    close
                );
                match decision.action {
                    DecisionAction::Buy => holdings.buy(decision.amount, close),
                    DecisionAction::Sell => holdings.sell(decision.amount, close),
                    DecisionAction::Hold => {}
                }
            } else {
                warn!(
                    "{}: skipping decision on {} with unusable close {}",
                    kind.display_name(),
                    price.date,
                    close
                );
            }
        }

        let valuation_close = if close.is_finite() && close > 0.0 {
            close
        } else {
            0.0
        };
        points.push(TrajectoryPoint::from_holdings(
            price.date,
            valuation_close,
            holdings.shares_total,
            holdings.invested_total,
        ));
    }

    Ok(Trajectory::new(points))
}

/// Simulate and score each requested strategy in parallel. Results come back
/// in the order of `kinds`.
pub fn run_strategies(
    prices: &[PricePoint],
    config: &StrategyConfig,
    kinds: &[StrategyKind],
) -> Vec<StrategyRun> {
    info!(
        "Running {} strategies over {} price points",
        kinds.len(),
        prices.len()
    );

    kinds
        .par_iter()
        .map(|&kind| {
            let trajectory = simulate(kind, prices, config);
            let report = PerformanceCalculator::calculate_report(&trajectory, &config.irr);
            StrategyRun {
                kind,
                trajectory,
                report,
            }
        })
        .collect()
}
