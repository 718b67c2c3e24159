use crate::config::StrategyConfig;
use crate::models::*;
use crate::strategy_utils::{buy_decision, hold_decision};

/// Invests every monthly contribution the series spans on its first day.
pub struct LumpSumStrategy {
    contribution: f64,
}

impl LumpSumStrategy {
    pub fn new(config: &StrategyConfig) -> Self {
        Self {
            contribution: config.monthly_contribution,
        }
    }
}

impl super::Strategy for LumpSumStrategy {
    fn kind(&self) -> super::StrategyKind {
        super::StrategyKind::LumpSum
    }

    fn get_min_data_points(&self) -> usize {
        1
    }

    fn decide(&self, context: &DecisionContext<'_>) -> MonthlyDecision {
        if context.index != 0 {
            return hold_decision();
        }
        buy_decision(self.contribution * context.total_months as f64)
    }
}
