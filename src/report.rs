use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// Marker shown for any metric that cannot be computed.
pub const UNAVAILABLE: &str = "—";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKey {
    TotalInvested,
    FinalValue,
    Roi,
    Irr,
    Cagr,
    MaxDrawdown,
    CalmarRatio,
    Years,
}

impl MetricKey {
    /// Report order.
    pub const ALL: [MetricKey; 8] = [
        MetricKey::TotalInvested,
        MetricKey::FinalValue,
        MetricKey::Roi,
        MetricKey::Irr,
        MetricKey::Cagr,
        MetricKey::MaxDrawdown,
        MetricKey::CalmarRatio,
        MetricKey::Years,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MetricKey::TotalInvested => "Total Invested",
            MetricKey::FinalValue => "Final Value",
            MetricKey::Roi => "ROI",
            MetricKey::Irr => "IRR",
            MetricKey::Cagr => "CAGR",
            MetricKey::MaxDrawdown => "Max Drawdown",
            MetricKey::CalmarRatio => "Calmar Ratio",
            MetricKey::Years => "Years",
        }
    }

    fn position(self) -> usize {
        match self {
            MetricKey::TotalInvested => 0,
            MetricKey::FinalValue => 1,
            MetricKey::Roi => 2,
            MetricKey::Irr => 3,
            MetricKey::Cagr => 4,
            MetricKey::MaxDrawdown => 5,
            MetricKey::CalmarRatio => 6,
            MetricKey::Years => 7,
        }
    }

    /// Wrap a raw value in the display unit this key uses.
    fn value(self, raw: Option<f64>) -> MetricValue {
        let Some(raw) = raw.filter(|value| value.is_finite()) else {
            return MetricValue::Unavailable;
        };
        match self {
            MetricKey::TotalInvested | MetricKey::FinalValue => MetricValue::Currency(raw),
            MetricKey::Roi | MetricKey::Irr | MetricKey::Cagr | MetricKey::MaxDrawdown => {
                MetricValue::Percent(raw)
            }
            MetricKey::CalmarRatio => MetricValue::Ratio(raw),
            MetricKey::Years => MetricValue::Years(raw),
        }
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Currency(f64),
    Percent(f64),
    Ratio(f64),
    Years(f64),
    Unavailable,
}

impl MetricValue {
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            MetricValue::Currency(v)
            | MetricValue::Percent(v)
            | MetricValue::Ratio(v)
            | MetricValue::Years(v) => Some(v),
            MetricValue::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, MetricValue::Unavailable)
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            MetricValue::Currency(v) => write!(f, "${}", format_grouped(v, 2)),
            MetricValue::Percent(v) => write!(f, "{}%", format_grouped(v, 2)),
            MetricValue::Ratio(v) => f.write_str(&format_grouped(v, 2)),
            MetricValue::Years(v) => f.write_str(&format_grouped(v, 1)),
            MetricValue::Unavailable => f.write_str(UNAVAILABLE),
        }
    }
}

/// Formats `value` with `decimals` places and comma thousands separators.
pub fn format_grouped(value: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, value.abs());
    let (integer, fraction) = match fixed.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(fixed.len() + integer.len() / 3 + 1);
    if value < 0.0 {
        grouped.push('-');
    }
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}

/// Fixed-key performance report; every key is always present.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsReport {
    values: [MetricValue; 8],
}

impl MetricsReport {
    pub fn unavailable() -> Self {
        Self {
            values: [MetricValue::Unavailable; 8],
        }
    }

    /// Build a report from raw values in [`MetricKey::ALL`] order.
    pub fn from_raw(raw: [Option<f64>; 8]) -> Self {
        let mut values = [MetricValue::Unavailable; 8];
        for (key, raw_value) in MetricKey::ALL.into_iter().zip(raw) {
            values[key.position()] = key.value(raw_value);
        }
        Self { values }
    }

    pub fn get(&self, key: MetricKey) -> &MetricValue {
        &self.values[key.position()]
    }

    /// Formatted value for `key`.
    pub fn display(&self, key: MetricKey) -> String {
        self.get(key).to_string()
    }

    pub fn entries(&self) -> impl Iterator<Item = (MetricKey, &MetricValue)> + '_ {
        MetricKey::ALL.into_iter().map(move |key| (key, self.get(key)))
    }

    pub fn is_all_unavailable(&self) -> bool {
        self.values.iter().all(|value| !value.is_available())
    }
}

impl Serialize for MetricsReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (key, value) in self.entries() {
            map.serialize_entry(key.label(), &value.to_string())?;
        }
        map.end()
    }
}
