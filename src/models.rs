use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::report::MetricsReport;
use crate::strategy::StrategyKind;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    pub date: NaiveDate,
    pub portf_value: f64,
    pub invested_total: f64,
    pub shares_total: f64,
    pub profit_loss: f64,
}

impl TrajectoryPoint {
    /// Builds a record from holdings valued at the day's close.
    pub fn from_holdings(date: NaiveDate, close: f64, shares_total: f64, invested_total: f64) -> Self {
        let portf_value = (shares_total * close).max(0.0);
        Self {
            date,
            portf_value,
            invested_total,
            shares_total,
            profit_loss: portf_value - invested_total,
        }
    }
}

/// Daily portfolio path produced by one strategy simulation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trajectory {
    points: Vec<TrajectoryPoint>,
}

impl Trajectory {
    pub fn new(points: Vec<TrajectoryPoint>) -> Self {
        Self { points }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn points(&self) -> &[TrajectoryPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&TrajectoryPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&TrajectoryPoint> {
        self.points.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrajectoryPoint> {
        self.points.iter()
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a TrajectoryPoint;
    type IntoIter = std::slice::Iter<'a, TrajectoryPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Outcome of simulating and scoring one strategy within a multi-strategy run.
#[derive(Debug, Clone, Serialize)]
pub struct StrategyRun {
    pub kind: StrategyKind,
    pub trajectory: Trajectory,
    pub report: MetricsReport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionAction {
    Buy,
    Sell,
    Hold,
}

/// What a strategy wants done with cash on a decision day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyDecision {
    pub action: DecisionAction,
    pub amount: f64,
}

/// Inputs visible to a strategy on a decision day. `history` holds closes up
/// to and including the decision day.
#[derive(Debug, Clone, Copy)]
pub struct DecisionContext<'a> {
    pub date: NaiveDate,
    pub index: usize,
    pub close: f64,
    pub history: &'a [f64],
    pub month_ordinal: usize,
    pub total_months: usize,
    pub shares_total: f64,
}

impl DecisionContext<'_> {
    /// Portfolio value at the decision-day close, before any trade.
    pub fn portfolio_value(&self) -> f64 {
        (self.shares_total * self.close).max(0.0)
    }
}
