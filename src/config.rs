use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_MONTHLY_CONTRIBUTION: f64 = 150.0;
pub const DEFAULT_DRAWDOWN_THRESHOLD: f64 = 0.15;
pub const DEFAULT_SMA_PERIOD: usize = 90;
pub const DEFAULT_GROWTH_RATE: f64 = 0.006;

/// Prefix of environment settings understood by [`StrategyConfig::from_settings_map`].
pub const SETTINGS_PREFIX: &str = "DCA_";

/// Reference high that the double-down rule measures its drop against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeakReference {
    /// Highest close observed from the start of the series.
    #[default]
    AllTime,
    /// Highest close over the last `n` trading days, decision day included.
    Trailing(usize),
}

impl PeakReference {
    /// A window of zero means no window at all.
    pub fn from_window(window: usize) -> Self {
        if window == 0 {
            Self::AllTime
        } else {
            Self::Trailing(window)
        }
    }
}

/// How value averaging behaves when the portfolio is ahead of its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueAveragingPolicy {
    /// Skip buying; never sell.
    #[default]
    BuyOnly,
    /// Sell the surplus above target, returning cash to the investor.
    AllowWithdrawal,
}

/// Bounds for the IRR root finder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IrrSolverSettings {
    pub max_iterations: usize,
    pub tolerance: f64,
    pub initial_guess: f64,
}

impl Default for IrrSolverSettings {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            tolerance: 1e-10,
            initial_guess: 0.01,
        }
    }
}

/// Parameters shared by every strategy; each strategy reads the ones it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    pub monthly_contribution: f64,
    pub drawdown_threshold: f64,
    pub sma_period: usize,
    pub growth_rate: f64,
    pub peak_reference: PeakReference,
    pub value_averaging_policy: ValueAveragingPolicy,
    pub irr: IrrSolverSettings,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            monthly_contribution: DEFAULT_MONTHLY_CONTRIBUTION,
            drawdown_threshold: DEFAULT_DRAWDOWN_THRESHOLD,
            sma_period: DEFAULT_SMA_PERIOD,
            growth_rate: DEFAULT_GROWTH_RATE,
            peak_reference: PeakReference::AllTime,
            value_averaging_policy: ValueAveragingPolicy::BuyOnly,
            irr: IrrSolverSettings::default(),
        }
    }
}

impl StrategyConfig {
    /// Create a config from a parameter map, falling back to defaults for missing keys
    pub fn from_parameters(parameters: &HashMap<String, f64>) -> Self {
        Self::default().with_parameters(parameters)
    }

    /// Overlay a parameter map on top of this config
    pub fn with_parameters(self, parameters: &HashMap<String, f64>) -> Self {
        use crate::param_utils::*;

        let peak_reference = match parameters.get("peakWindow") {
            Some(_) => PeakReference::from_window(get_usize_param_min(parameters, "peakWindow", 0, 0)),
            None => self.peak_reference,
        };
        let value_averaging_policy = match parameters.get("allowWithdrawal") {
            Some(_) => {
                if coerce_binary_param(get_param(parameters, "allowWithdrawal", 0.0), 0.0) >= 1.0 {
                    ValueAveragingPolicy::AllowWithdrawal
                } else {
                    ValueAveragingPolicy::BuyOnly
                }
            }
            None => self.value_averaging_policy,
        };

        Self {
            monthly_contribution: get_param_f64_finite(
                parameters,
                "monthlyContribution",
                self.monthly_contribution,
            ),
            drawdown_threshold: get_param_f64_finite(
                parameters,
                "drawdownThreshold",
                self.drawdown_threshold,
            ),
            sma_period: get_usize_param_min(parameters, "smaPeriod", self.sma_period, 1),
            growth_rate: get_param_f64_finite(parameters, "growthRate", self.growth_rate),
            peak_reference,
            value_averaging_policy,
            irr: IrrSolverSettings {
                max_iterations: get_usize_param_min(
                    parameters,
                    "irrMaxIterations",
                    self.irr.max_iterations,
                    1,
                ),
                tolerance: get_param_f64_finite(parameters, "irrTolerance", self.irr.tolerance),
                initial_guess: self.irr.initial_guess,
            },
        }
    }

    /// Parse `DCA_*` settings. Missing settings keep their defaults, present ones
    /// must parse and lie within range.
    pub fn from_settings_map(settings: &HashMap<String, String>) -> Result<Self> {
        let defaults = Self::default();

        let monthly_contribution =
            match optional_setting_f64(settings, "DCA_MONTHLY_CONTRIBUTION", None)? {
                Some(value) => {
                    check_monthly_contribution(value)
                        .context("Invalid setting DCA_MONTHLY_CONTRIBUTION")?;
                    value
                }
                None => defaults.monthly_contribution,
            };
        let drawdown_threshold =
            match optional_setting_f64(settings, "DCA_DRAWDOWN_THRESHOLD", None)? {
                Some(value) => {
                    check_drawdown_threshold(value)
                        .context("Invalid setting DCA_DRAWDOWN_THRESHOLD")?;
                    value
                }
                None => defaults.drawdown_threshold,
            };
        let sma_period = optional_setting_usize(settings, "DCA_SMA_PERIOD", 1)?
            .unwrap_or(defaults.sma_period);
        let growth_rate = optional_setting_f64(settings, "DCA_GROWTH_RATE", Some(0.0))?
            .unwrap_or(defaults.growth_rate);
        let peak_reference = optional_setting_usize(settings, "DCA_PEAK_WINDOW", 0)?
            .map(PeakReference::from_window)
            .unwrap_or(defaults.peak_reference);
        let value_averaging_policy = match optional_setting(settings, "DCA_VALUE_AVERAGING_POLICY") {
            Some(raw) => parse_value_averaging_policy(raw)?,
            None => defaults.value_averaging_policy,
        };
        let max_iterations = optional_setting_usize(settings, "DCA_IRR_MAX_ITERATIONS", 1)?
            .unwrap_or(defaults.irr.max_iterations);
        let tolerance = optional_setting_f64(settings, "DCA_IRR_TOLERANCE", Some(0.0))?
            .unwrap_or(defaults.irr.tolerance);

        Ok(Self {
            monthly_contribution,
            drawdown_threshold,
            sma_period,
            growth_rate,
            peak_reference,
            value_averaging_policy,
            irr: IrrSolverSettings {
                max_iterations,
                tolerance,
                initial_guess: defaults.irr.initial_guess,
            },
        })
    }

    /// Collect `DCA_*` variables from the process environment.
    pub fn from_env() -> Result<Self> {
        let settings: HashMap<String, String> = std::env::vars()
            .filter(|(key, _)| key.starts_with(SETTINGS_PREFIX))
            .collect();
        Self::from_settings_map(&settings)
    }

    /// Strict check for callers that want to reject parameters the engine
    /// would otherwise tolerate.
    pub fn validate(&self) -> Result<()> {
        check_monthly_contribution(self.monthly_contribution)?;
        check_drawdown_threshold(self.drawdown_threshold)?;
        if self.sma_period == 0 {
            return Err(anyhow!("SMA period must be at least 1 trading day"));
        }
        if !self.growth_rate.is_finite() || self.growth_rate < 0.0 {
            return Err(anyhow!(
                "Growth rate must be >= 0 (value: {})",
                self.growth_rate
            ));
        }
        if let PeakReference::Trailing(0) = self.peak_reference {
            return Err(anyhow!("Trailing peak window must be at least 1 trading day"));
        }
        if self.irr.max_iterations == 0 || !(self.irr.tolerance > 0.0) {
            return Err(anyhow!(
                "IRR solver needs max_iterations >= 1 and tolerance > 0 (values: {}, {})",
                self.irr.max_iterations,
                self.irr.tolerance
            ));
        }
        Ok(())
    }
}

fn check_monthly_contribution(value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(anyhow!("Monthly contribution must be > 0 (value: {})", value));
    }
    Ok(())
}

/// The threshold is a fraction of the peak, exclusive at both ends.
fn check_drawdown_threshold(value: f64) -> Result<()> {
    if !(value > 0.0 && value < 1.0) {
        return Err(anyhow!(
            "Drawdown threshold must be within (0, 1) (value: {})",
            value
        ));
    }
    Ok(())
}

fn parse_value_averaging_policy(raw: &str) -> Result<ValueAveragingPolicy> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "buy_only" | "buy-only" => Ok(ValueAveragingPolicy::BuyOnly),
        "allow_withdrawal" | "allow-withdrawal" | "withdraw" => {
            Ok(ValueAveragingPolicy::AllowWithdrawal)
        }
        other => Err(anyhow!(
            "DCA_VALUE_AVERAGING_POLICY must be BUY_ONLY or ALLOW_WITHDRAWAL (value: {})",
            other
        )),
    }
}

fn optional_setting<'a>(settings: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    settings
        .get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

fn optional_setting_f64(
    settings: &HashMap<String, String>,
    key: &str,
    min: Option<f64>,
) -> Result<Option<f64>> {
    let Some(raw) = optional_setting(settings, key) else {
        return Ok(None);
    };
    let value = raw
        .parse::<f64>()
        .map_err(|_| anyhow!("Setting {} must be a number (value: {})", key, raw))?;
    if !value.is_finite() {
        return Err(anyhow!("Setting {} must be finite (value: {})", key, raw));
    }
    if let Some(min_value) = min {
        if value < min_value {
            return Err(anyhow!(
                "Setting {} must be >= {} (value: {})",
                key,
                min_value,
                raw
            ));
        }
    }
    Ok(Some(value))
}

fn optional_setting_usize(
    settings: &HashMap<String, String>,
    key: &str,
    min: usize,
) -> Result<Option<usize>> {
    let Some(raw) = optional_setting(settings, key) else {
        return Ok(None);
    };
    let value = raw
        .parse::<f64>()
        .map_err(|_| anyhow!("Setting {} must be a number (value: {})", key, raw))?;
    if !value.is_finite() {
        return Err(anyhow!("Setting {} must be finite (value: {})", key, raw));
    }
    if value.fract() != 0.0 {
        return Err(anyhow!(
            "Setting {} must be an integer (value: {})",
            key,
            raw
        ));
    }
    if value < min as f64 {
        return Err(anyhow!(
            "Setting {} must be >= {} (value: {})",
            key,
            min,
            raw
        ));
    }
    Ok(Some(value as usize))
}
