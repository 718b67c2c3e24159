use crate::config::{StrategyConfig, ValueAveragingPolicy};
use crate::models::*;
use crate::strategy_utils::{buy_decision, hold_decision, sell_decision, value_path_target};

/// Keeps the portfolio on a target path that grows by `growth_rate` per month
/// plus one contribution.
pub struct ValueAveragingStrategy {
    contribution: f64,
    growth_rate: f64,
    policy: ValueAveragingPolicy,
}

impl ValueAveragingStrategy {
    pub fn new(config: &StrategyConfig) -> Self {
        let growth_rate = if config.growth_rate.is_finite() {
            config.growth_rate.max(0.0)
        } else {
            0.0
        };
        Self {
            contribution: config.monthly_contribution,
            growth_rate,
            policy: config.value_averaging_policy,
        }
    }

    pub fn target_for_month(&self, month_ordinal: usize) -> f64 {
        value_path_target(self.contribution, self.growth_rate, month_ordinal)
    }
}

impl super::Strategy for ValueAveragingStrategy {
    fn kind(&self) -> super::StrategyKind {
        super::StrategyKind::ValueAveraging
    }

    fn get_min_data_points(&self) -> usize {
        1
    }

    fn decide(&self, context: &DecisionContext<'_>) -> MonthlyDecision {
        let target = self.target_for_month(context.month_ordinal);
        let gap = target - context.portfolio_value();

        if gap > 0.0 {
            return buy_decision(gap);
        }

        match self.policy {
            ValueAveragingPolicy::AllowWithdrawal if gap < 0.0 => sell_decision(-gap),
            _ => hold_decision(),
        }
    }
}
