//! Internal rate of return over evenly spaced cash flows.
//!
//! The root finder starts with Newton steps from the configured guess and falls
//! back to bisection over `(-1, upper]` when Newton leaves the domain or stalls.
//! Both stages are bounded by `max_iterations`; `None` means no rate was found.

use crate::calendar;
use crate::config::IrrSolverSettings;
use crate::models::Trajectory;

const RATE_FLOOR: f64 = -1.0 + 1e-9;
const MAX_UPPER_BOUND: f64 = 1e6;
/// Shortest trajectory that carries a meaningful money-weighted return.
const MIN_IRR_RECORDS: usize = 3;

/// Net present value of `cashflows` at a periodic `rate`; flow `t` is
/// discounted by `(1 + rate)^t`.
pub fn npv(rate: f64, cashflows: &[f64]) -> f64 {
    let base = 1.0 + rate;
    cashflows
        .iter()
        .enumerate()
        .map(|(t, cf)| cf / base.powi(t as i32))
        .sum()
}

fn npv_derivative(rate: f64, cashflows: &[f64]) -> f64 {
    let base = 1.0 + rate;
    cashflows
        .iter()
        .enumerate()
        .skip(1)
        .map(|(t, cf)| -(t as f64) * cf / base.powi(t as i32 + 1))
        .sum()
}

/// Periodic rate that zeroes the NPV of `cashflows`.
pub fn solve_periodic_rate(cashflows: &[f64], settings: &IrrSolverSettings) -> Option<f64> {
    let has_inflow = cashflows.iter().any(|cf| *cf > 0.0);
    let has_outflow = cashflows.iter().any(|cf| *cf < 0.0);
    if !has_inflow || !has_outflow || cashflows.iter().any(|cf| !cf.is_finite()) {
        return None;
    }

    newton(cashflows, settings).or_else(|| bisection(cashflows, settings))
}

fn newton(cashflows: &[f64], settings: &IrrSolverSettings) -> Option<f64> {
    let mut rate = settings.initial_guess;

    for _ in 0..settings.max_iterations {
        let value = npv(rate, cashflows);
        let slope = npv_derivative(rate, cashflows);
        if !value.is_finite() || !slope.is_finite() || slope.abs() < 1e-14 {
            return None;
        }

        let next = rate - value / slope;
        if !next.is_finite() || next <= RATE_FLOOR {
            return None;
        }
        if (next - rate).abs() < settings.tolerance {
            return Some(next);
        }
        rate = next;
    }

    None
}

/// Finds two adjacent grid rates whose NPVs have opposite signs, searching a
/// grid that approaches -1 from above and doubles upward from 1.
fn bracket(cashflows: &[f64]) -> Option<(f64, f64)> {
    let mut grid: Vec<f64> = (1..=9).rev().map(|k| -1.0 + 10f64.powi(-k)).collect();
    grid.push(-0.5);
    grid.push(0.0);
    let mut upper = 1.0;
    while upper <= MAX_UPPER_BOUND {
        grid.push(upper);
        upper *= 2.0;
    }

    let samples: Vec<(f64, f64)> = grid
        .into_iter()
        .map(|rate| (rate, npv(rate, cashflows)))
        .filter(|(_, value)| value.is_finite())
        .collect();

    if let Some((rate, _)) = samples.iter().find(|(_, value)| *value == 0.0) {
        return Some((*rate, *rate));
    }

    samples
        .windows(2)
        .find(|pair| pair[0].1.signum() != pair[1].1.signum())
        .map(|pair| (pair[0].0, pair[1].0))
}

fn bisection(cashflows: &[f64], settings: &IrrSolverSettings) -> Option<f64> {
    let (mut low, mut high) = bracket(cashflows)?;
    if low == high {
        return Some(low);
    }
    let mut low_value = npv(low, cashflows);

    for _ in 0..settings.max_iterations {
        let mid = 0.5 * (low + high);
        let mid_value = npv(mid, cashflows);
        if !mid_value.is_finite() {
            return None;
        }
        if mid_value == 0.0 || (high - low) * 0.5 < settings.tolerance {
            return Some(mid);
        }
        if mid_value.signum() == low_value.signum() {
            low = mid;
            low_value = mid_value;
        } else {
            high = mid;
        }
    }

    None
}

/// Monthly investor cash flows of a trajectory: contributions are outflows,
/// the final portfolio value is liquidated in the last month. Calendar months
/// without a record contribute a zero flow so periods stay one month apart.
pub fn monthly_cashflows(trajectory: &Trajectory) -> Vec<f64> {
    let points = trajectory.points();
    let Some(last) = points.last() else {
        return Vec::new();
    };

    let month_ends = calendar::month_end_indices(points, |p| p.date);
    let mut cashflows = Vec::with_capacity(month_ends.len());
    let mut previous: Option<(calendar::MonthKey, f64)> = None;
    for index in month_ends {
        let key = calendar::month_key(points[index].date);
        let invested = points[index].invested_total;
        let previous_invested = match previous {
            Some((previous_key, previous_invested)) => {
                let skipped = calendar::months_between(previous_key, key).saturating_sub(1);
                cashflows.extend(std::iter::repeat(0.0).take(skipped));
                previous_invested
            }
            None => 0.0,
        };
        cashflows.push(-(invested - previous_invested));
        previous = Some((key, invested));
    }

    if let Some(final_flow) = cashflows.last_mut() {
        *final_flow += last.portf_value;
    }
    cashflows
}

pub fn annualize_monthly_rate(rate: f64) -> f64 {
    (1.0 + rate).powi(12) - 1.0
}

/// Annualized IRR of a trajectory's monthly cash flows, as a fraction.
pub fn annualized_irr(trajectory: &Trajectory, settings: &IrrSolverSettings) -> Option<f64> {
    if trajectory.len() < MIN_IRR_RECORDS {
        return None;
    }
    let cashflows = monthly_cashflows(trajectory);
    let monthly = solve_periodic_rate(&cashflows, settings)?;
    let annual = annualize_monthly_rate(monthly);
    if annual.is_finite() {
        Some(annual)
    } else {
        None
    }
}
