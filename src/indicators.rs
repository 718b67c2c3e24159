use statrs::statistics::Statistics;

/// Trailing simple moving average ending at the last element of `prices`.
/// Returns `None` until `period` values are available.
pub fn trailing_sma_at(prices: &[f64], period: usize) -> Option<f64> {
    let period = period.max(1);
    if prices.len() < period {
        return None;
    }

    let window = &prices[prices.len() - period..];
    let mean = Statistics::mean(window);
    if mean.is_finite() {
        Some(mean)
    } else {
        None
    }
}

/// Highest value seen so far.
pub fn running_peak(prices: &[f64]) -> Option<f64> {
    if prices.is_empty() {
        return None;
    }
    Some(Statistics::max(prices))
}

/// Highest value over the last `window` elements; shorter histories use what
/// is available.
pub fn trailing_peak(prices: &[f64], window: usize) -> Option<f64> {
    if prices.is_empty() {
        return None;
    }
    let window = window.max(1).min(prices.len());
    Some(Statistics::max(&prices[prices.len() - window..]))
}

/// Cumulative maximum of a series, element by element.
pub fn cumulative_max(values: &[f64]) -> Vec<f64> {
    let mut peaks = Vec::with_capacity(values.len());
    let mut peak = f64::NEG_INFINITY;
    for value in values.iter().copied() {
        if value > peak {
            peak = value;
        }
        peaks.push(peak);
    }
    peaks
}
