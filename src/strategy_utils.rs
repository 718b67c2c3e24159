use crate::models::{DecisionAction, MonthlyDecision};

/// Create a hold decision (default action when the month is skipped)
pub fn hold_decision() -> MonthlyDecision {
    MonthlyDecision {
        action: DecisionAction::Hold,
        amount: 0.0,
    }
}

/// Create a buy decision for the given cash amount
pub fn buy_decision(amount: f64) -> MonthlyDecision {
    MonthlyDecision {
        action: DecisionAction::Buy,
        amount,
    }
}

/// Create a sell decision for the given cash amount
pub fn sell_decision(amount: f64) -> MonthlyDecision {
    MonthlyDecision {
        action: DecisionAction::Sell,
        amount,
    }
}

/// Cash amount that can actually be traded; anything non-finite or non-positive is dropped.
pub fn tradable_amount(amount: f64) -> Option<f64> {
    if amount.is_finite() && amount > 0.0 {
        Some(amount)
    } else {
        None
    }
}

/// Value averaging target after `month_ordinal` months: the previous target
/// grown by `growth_rate`, plus one contribution.
pub fn value_path_target(contribution: f64, growth_rate: f64, month_ordinal: usize) -> f64 {
    let growth = 1.0 + growth_rate.max(0.0);
    let mut target = 0.0;
    for _ in 0..month_ordinal {
        target = target * growth + contribution;
    }
    target
}
