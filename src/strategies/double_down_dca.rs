use crate::config::{PeakReference, StrategyConfig};
use crate::indicators;
use crate::models::*;
use crate::strategy_utils::buy_decision;
use log::debug;

pub struct DoubleDownDcaStrategy {
    contribution: f64,
    threshold: f64,
    peak_reference: PeakReference,
}

impl DoubleDownDcaStrategy {
    pub fn new(config: &StrategyConfig) -> Self {
        Self {
            contribution: config.monthly_contribution,
            threshold: config.drawdown_threshold,
            peak_reference: config.peak_reference,
        }
    }

    fn reference_peak(&self, history: &[f64]) -> Option<f64> {
        match self.peak_reference {
            PeakReference::AllTime => indicators::running_peak(history),
            PeakReference::Trailing(window) => indicators::trailing_peak(history, window),
        }
    }

    /// True when the close sits more than `threshold` below the reference peak.
    fn is_discounted(&self, close: f64, history: &[f64]) -> bool {
        if !self.threshold.is_finite() || self.threshold <= 0.0 || self.threshold >= 1.0 {
            return false;
        }
        let Some(peak) = self.reference_peak(history) else {
            return false;
        };
        if peak <= 0.0 {
            return false;
        }
        close / peak - 1.0 < -self.threshold
    }
}

impl super::Strategy for DoubleDownDcaStrategy {
    fn kind(&self) -> super::StrategyKind {
        super::StrategyKind::DoubleDownDca
    }

    fn get_min_data_points(&self) -> usize {
        1
    }

    fn decide(&self, context: &DecisionContext<'_>) -> MonthlyDecision {
        if self.is_discounted(context.close, context.history) {
            debug!(
                "{}: close {:.2} is more than {:.0}% below peak, doubling contribution",
                context.date,
                context.close,
                self.threshold * 100.0
            );
            return buy_decision(self.contribution * 2.0);
        }
        buy_decision(self.contribution)
    }
}
