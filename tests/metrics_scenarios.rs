mod common;

use anyhow::Result;
use common::*;
use dca_engine::{
    run_strategies, simulate, MetricKey, PerformanceCalculator, PricePoint, StrategyConfig,
    StrategyKind, UNAVAILABLE,
};

fn report_for(kind: StrategyKind, prices: &[PricePoint], config: &StrategyConfig) -> dca_engine::MetricsReport {
    let trajectory = simulate(kind, prices, config);
    PerformanceCalculator::calculate_report(&trajectory, &config.irr)
}

#[test]
fn flat_prices_report_break_even() {
    ensure_test_env();
    let config = config_with_contribution(100.0);
    let report = report_for(StrategyKind::StandardDca, &flat_year(100.0), &config);

    assert_eq!(report.display(MetricKey::TotalInvested), "$1,200.00");
    assert_eq!(report.display(MetricKey::FinalValue), "$1,200.00");
    assert_eq!(report.display(MetricKey::Roi), "0.00%");
    assert_eq!(report.display(MetricKey::Cagr), "0.00%");
    assert_eq!(report.display(MetricKey::MaxDrawdown), "0.00%");
    assert_eq!(report.display(MetricKey::Years), "1.0");
    // No drawdown leaves the ratio undefined.
    assert_eq!(report.display(MetricKey::CalmarRatio), UNAVAILABLE);

    let irr = report.get(MetricKey::Irr).as_f64().unwrap();
    assert!(irr.abs() < 1e-6);
}

#[test]
fn empty_series_reports_every_metric_unavailable() {
    ensure_test_env();
    let runs = run_strategies(&[], &StrategyConfig::default(), &StrategyKind::ALL);
    assert_eq!(runs.len(), StrategyKind::ALL.len());
    for run in runs {
        assert!(run.trajectory.is_empty());
        assert!(run.report.is_all_unavailable(), "{}", run.kind);
        for (_, value) in run.report.entries() {
            assert_eq!(value.to_string(), UNAVAILABLE);
        }
    }
}

#[test]
fn single_month_series_has_no_irr() {
    ensure_test_env();
    let prices = vec![
        PricePoint::new(date(2023, 3, 1), 100.0),
        PricePoint::new(date(2023, 3, 2), 105.0),
    ];
    let report = report_for(
        StrategyKind::StandardDca,
        &prices,
        &config_with_contribution(100.0),
    );

    assert_eq!(report.display(MetricKey::TotalInvested), "$100.00");
    assert_eq!(report.display(MetricKey::FinalValue), "$105.00");
    assert_eq!(report.display(MetricKey::Roi), "5.00%");
    assert!(report.get(MetricKey::Cagr).is_available());
    assert_eq!(report.display(MetricKey::MaxDrawdown), "0.00%");
    assert_eq!(report.display(MetricKey::Irr), UNAVAILABLE);
}

#[test]
fn two_record_series_across_months_has_no_irr() {
    ensure_test_env();
    let prices = vec![
        PricePoint::new(date(2023, 1, 31), 100.0),
        PricePoint::new(date(2023, 2, 1), 110.0),
    ];
    let report = report_for(
        StrategyKind::StandardDca,
        &prices,
        &config_with_contribution(100.0),
    );

    assert_eq!(report.display(MetricKey::TotalInvested), "$200.00");
    assert_eq!(report.display(MetricKey::FinalValue), "$210.00");
    assert_eq!(report.display(MetricKey::Roi), "5.00%");
    assert!(report.get(MetricKey::Cagr).is_available());
    assert!(report.get(MetricKey::MaxDrawdown).is_available());
    assert_eq!(report.display(MetricKey::Irr), UNAVAILABLE);
}

#[test]
fn max_drawdown_is_never_positive() {
    ensure_test_env();
    let prices = choppy_series();
    let config = StrategyConfig {
        sma_period: 30,
        ..config_with_contribution(100.0)
    };

    for run in run_strategies(&prices, &config, &StrategyKind::ALL) {
        let drawdown = run.report.get(MetricKey::MaxDrawdown).as_f64().unwrap();
        assert!(drawdown <= 0.0, "{}", run.kind);
        // The slump in the series shows up for everything fully invested.
        if matches!(run.kind, StrategyKind::StandardDca | StrategyKind::LumpSum) {
            assert!(drawdown < 0.0, "{}", run.kind);
        }
    }
}

#[test]
fn monotone_values_have_zero_drawdown() {
    ensure_test_env();
    let prices = linear_year(100.0, 200.0);
    let config = config_with_contribution(100.0);

    for kind in [StrategyKind::StandardDca, StrategyKind::LumpSum] {
        let trajectory = simulate(kind, &prices, &config);
        assert!(trajectory
            .points()
            .windows(2)
            .all(|pair| pair[1].portf_value >= pair[0].portf_value));
        assert_eq!(PerformanceCalculator::calculate_max_drawdown(&trajectory), 0.0);
    }
}

#[test]
fn calmar_sign_matches_cagr_sign() {
    ensure_test_env();
    let config = config_with_contribution(100.0);
    let falling = price_series(date(2019, 1, 1), date(2020, 12, 31), |i, n| {
        let base = 200.0 - 120.0 * i as f64 / (n - 1) as f64;
        base + 4.0 * (i as f64 / 3.0).sin()
    });

    for prices in [choppy_series(), falling] {
        for run in run_strategies(&prices, &config, &StrategyKind::ALL) {
            let cagr = run.report.get(MetricKey::Cagr).as_f64();
            let calmar = run.report.get(MetricKey::CalmarRatio).as_f64();
            if let (Some(cagr), Some(calmar)) = (cagr, calmar) {
                assert_eq!(cagr.signum(), calmar.signum(), "{}", run.kind);
            }
        }
    }

    let lump = report_for(
        StrategyKind::LumpSum,
        &price_series(date(2019, 1, 1), date(2019, 12, 31), |i, _| 100.0 - 0.1 * i as f64),
        &config,
    );
    assert!(lump.get(MetricKey::Cagr).as_f64().unwrap() < 0.0);
    assert!(lump.get(MetricKey::CalmarRatio).as_f64().unwrap() < 0.0);
}

#[test]
fn lump_sum_and_dca_report_the_same_total_invested() {
    ensure_test_env();
    let prices = choppy_series();
    let runs = run_strategies(
        &prices,
        &config_with_contribution(150.0),
        &[StrategyKind::StandardDca, StrategyKind::LumpSum],
    );

    assert_eq!(runs[0].report.display(MetricKey::TotalInvested), "$5,400.00");
    assert_eq!(
        runs[0].report.display(MetricKey::TotalInvested),
        runs[1].report.display(MetricKey::TotalInvested)
    );
}

#[test]
fn repeated_runs_produce_identical_reports() -> Result<()> {
    ensure_test_env();
    let prices = choppy_series();
    let config = StrategyConfig {
        sma_period: 45,
        ..config_with_contribution(175.0)
    };

    let first = run_strategies(&prices, &config, &StrategyKind::ALL);
    let second = run_strategies(&prices, &config, &StrategyKind::ALL);
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.kind, b.kind);
        assert_eq!(a.trajectory, b.trajectory);
        assert_eq!(a.report, b.report);
    }
    assert_eq!(serde_json::to_string(&first)?, serde_json::to_string(&second)?);
    Ok(())
}

#[test]
fn rising_market_irr_is_positive() {
    ensure_test_env();
    let report = report_for(
        StrategyKind::StandardDca,
        &linear_year(100.0, 150.0),
        &config_with_contribution(100.0),
    );
    let irr = report.get(MetricKey::Irr).as_f64().unwrap();
    let roi = report.get(MetricKey::Roi).as_f64().unwrap();
    assert!(irr > 0.0);
    assert!(roi > 0.0);
    // Money arrives over the year, so its annualised return beats the simple ROI.
    assert!(irr > roi);
}
