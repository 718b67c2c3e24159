use crate::config::StrategyConfig;
use crate::indicators;
use crate::models::*;
use crate::strategy_utils::{buy_decision, hold_decision};

pub struct SmaMomentumStrategy {
    contribution: f64,
    period: usize,
}

impl SmaMomentumStrategy {
    pub fn new(config: &StrategyConfig) -> Self {
        Self {
            contribution: config.monthly_contribution,
            period: config.sma_period.max(1),
        }
    }
}

impl super::Strategy for SmaMomentumStrategy {
    fn kind(&self) -> super::StrategyKind {
        super::StrategyKind::SmaMomentum
    }

    fn get_min_data_points(&self) -> usize {
        self.period
    }

    fn decide(&self, context: &DecisionContext<'_>) -> MonthlyDecision {
        // No signal until the window is filled.
        let Some(sma) = indicators::trailing_sma_at(context.history, self.period) else {
            return hold_decision();
        };

        if context.close >= sma {
            buy_decision(self.contribution)
        } else {
            hold_decision()
        }
    }
}
