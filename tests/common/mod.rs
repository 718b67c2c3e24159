#![allow(dead_code)]

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use dca_engine::{PricePoint, StrategyConfig};
use std::sync::Once;

pub fn ensure_test_env() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Weekdays from `start` through `end`, inclusive.
pub fn trading_days(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut day = start;
    while day <= end {
        if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            days.push(day);
        }
        day += Duration::days(1);
    }
    days
}

/// Prices on each trading day between `start` and `end`, with the close given
/// by `close_at(index, count)`.
pub fn price_series<F>(start: NaiveDate, end: NaiveDate, close_at: F) -> Vec<PricePoint>
where
    F: Fn(usize, usize) -> f64,
{
    let days = trading_days(start, end);
    let count = days.len();
    days.into_iter()
        .enumerate()
        .map(|(i, day)| PricePoint::new(day, close_at(i, count)))
        .collect()
}

pub fn flat_year(close: f64) -> Vec<PricePoint> {
    price_series(date(2021, 1, 1), date(2021, 12, 31), |_, _| close)
}

/// Linear rise from `from` to `to` over calendar 2021.
pub fn linear_year(from: f64, to: f64) -> Vec<PricePoint> {
    price_series(date(2021, 1, 1), date(2021, 12, 31), |i, n| {
        from + (to - from) * i as f64 / (n - 1) as f64
    })
}

/// Three years of a noisy, drifting series with a deep mid-period slump.
pub fn choppy_series() -> Vec<PricePoint> {
    price_series(date(2018, 1, 2), date(2020, 12, 31), |i, _| {
        let t = i as f64;
        let trend = 100.0 + 0.05 * t;
        let wave = 12.0 * (t / 17.0).sin() + 5.0 * (t / 5.0).cos();
        let slump = if (250..420).contains(&i) { -35.0 } else { 0.0 };
        (trend + wave + slump).max(1.0)
    })
}

pub fn config_with_contribution(contribution: f64) -> StrategyConfig {
    StrategyConfig {
        monthly_contribution: contribution,
        ..StrategyConfig::default()
    }
}
