use crate::config::IrrSolverSettings;
use crate::indicators::cumulative_max;
use crate::irr;
use crate::models::*;
use crate::report::MetricsReport;
use serde::Serialize;

const DAYS_PER_YEAR: f64 = 365.0;

/// Raw performance figures of a trajectory. Percentages are in percent units;
/// `None` marks a figure that is undefined for the trajectory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct KeyMetrics {
    pub total_invested: Option<f64>,
    pub final_value: Option<f64>,
    pub roi_percent: Option<f64>,
    pub irr_percent: Option<f64>,
    pub cagr_percent: Option<f64>,
    pub max_drawdown_percent: Option<f64>,
    pub calmar_ratio: Option<f64>,
    pub years: Option<f64>,
}

impl KeyMetrics {
    pub fn to_report(&self) -> MetricsReport {
        MetricsReport::from_raw([
            self.total_invested,
            self.final_value,
            self.roi_percent,
            self.irr_percent,
            self.cagr_percent,
            self.max_drawdown_percent,
            self.calmar_ratio,
            self.years,
        ])
    }
}

pub struct PerformanceCalculator;

impl PerformanceCalculator {
    pub fn calculate_report(trajectory: &Trajectory, irr_settings: &IrrSolverSettings) -> MetricsReport {
        Self::calculate_key_metrics(trajectory, irr_settings).to_report()
    }

    pub fn calculate_key_metrics(
        trajectory: &Trajectory,
        irr_settings: &IrrSolverSettings,
    ) -> KeyMetrics {
        let (Some(first), Some(last)) = (trajectory.first(), trajectory.last()) else {
            return KeyMetrics::default();
        };

        let final_value = last.portf_value;
        let total_invested = last.invested_total;
        let years = (last.date - first.date).num_days() as f64 / DAYS_PER_YEAR;

        let roi_percent = Self::calculate_roi(total_invested, final_value);
        let cagr_percent = Self::calculate_cagr(total_invested, final_value, years);
        let max_drawdown_percent = Self::calculate_max_drawdown(trajectory);
        let calmar_ratio = Self::calculate_calmar_ratio(cagr_percent, max_drawdown_percent);
        let irr_percent = irr::annualized_irr(trajectory, irr_settings).map(|rate| rate * 100.0);

        KeyMetrics {
            total_invested: Some(total_invested),
            final_value: Some(final_value),
            roi_percent,
            irr_percent,
            cagr_percent,
            max_drawdown_percent: Some(max_drawdown_percent),
            calmar_ratio,
            years: Some(years),
        }
    }

    fn calculate_roi(total_invested: f64, final_value: f64) -> Option<f64> {
        if !(total_invested > 0.0) || !final_value.is_finite() {
            return None;
        }
        finite((final_value / total_invested - 1.0) * 100.0)
    }

    /// Capital-weighted CAGR: contributions arrive over time, so the base is
    /// total invested capital rather than an opening balance.
    fn calculate_cagr(total_invested: f64, final_value: f64, years: f64) -> Option<f64> {
        if !(total_invested > 0.0) || !(years > 0.0) || !final_value.is_finite() {
            return None;
        }
        let ratio = final_value / total_invested;
        finite((ratio.powf(1.0 / years) - 1.0) * 100.0)
    }

    /// Most negative percentage fall from the running peak. Days before any
    /// capital is deployed (peak of zero) are ignored.
    pub fn calculate_max_drawdown(trajectory: &Trajectory) -> f64 {
        let values: Vec<f64> = trajectory.iter().map(|p| p.portf_value).collect();
        let peaks = cumulative_max(&values);

        let mut max_drawdown = 0.0_f64;
        for (value, peak) in values.iter().zip(peaks.iter()) {
            if !(*peak > 0.0) || !value.is_finite() {
                continue;
            }
            let drawdown = value / peak - 1.0;
            if drawdown < max_drawdown {
                max_drawdown = drawdown;
            }
        }

        max_drawdown * 100.0
    }

    fn calculate_calmar_ratio(cagr_percent: Option<f64>, max_drawdown_percent: f64) -> Option<f64> {
        let cagr = cagr_percent?;
        if max_drawdown_percent == 0.0 || !max_drawdown_percent.is_finite() {
            return None;
        }
        finite(cagr / max_drawdown_percent.abs())
    }
}

fn finite(value: f64) -> Option<f64> {
    if value.is_finite() {
        Some(value)
    } else {
        None
    }
}
