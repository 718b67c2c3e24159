use crate::config::StrategyConfig;
use crate::models::*;
use crate::strategy_utils::buy_decision;

pub struct StandardDcaStrategy {
    contribution: f64,
}

impl StandardDcaStrategy {
    pub fn new(config: &StrategyConfig) -> Self {
        Self {
            contribution: config.monthly_contribution,
        }
    }
}

impl super::Strategy for StandardDcaStrategy {
    fn kind(&self) -> super::StrategyKind {
        super::StrategyKind::StandardDca
    }

    fn get_min_data_points(&self) -> usize {
        1
    }

    fn decide(&self, _context: &DecisionContext<'_>) -> MonthlyDecision {
        buy_decision(self.contribution)
    }
}
