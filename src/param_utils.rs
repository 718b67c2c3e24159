use std::collections::HashMap;

/// Get a parameter value with a default fallback
pub fn get_param(params: &HashMap<String, f64>, key: &str, default: f64) -> f64 {
    params.get(key).copied().unwrap_or(default)
}

/// Extract a parameter as f64, falling back to the default when missing or not finite
pub fn get_param_f64_finite(params: &HashMap<String, f64>, key: &str, default: f64) -> f64 {
    params
        .get(key)
        .copied()
        .filter(|value| value.is_finite())
        .unwrap_or(default)
}

/// Extract a parameter as usize, rounded and clamped at a minimum, with finite checks
pub fn get_usize_param_min(
    params: &HashMap<String, f64>,
    key: &str,
    default: usize,
    min: usize,
) -> usize {
    params
        .get(key)
        .copied()
        .filter(|v| v.is_finite())
        .map(|v| v.round().max(min as f64) as usize)
        .unwrap_or(default)
}

pub fn coerce_binary_param(value: f64, default: f64) -> f64 {
    if !value.is_finite() {
        return default;
    }

    if value >= 0.5 {
        1.0
    } else {
        0.0
    }
}
