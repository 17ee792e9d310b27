//! Comfort score: how far net income goes against the local cost of living.

/// Curve steepness. At `ratio = 1` (income exactly covers the baseline) the
/// score is about 39; it approaches 100 asymptotically.
const STEEPNESS: f64 = 0.5;

/// Score in `[0, 100]`, rounded to one decimal.
///
/// `ratio = net_income / max(multiplier, 1) / local_baseline` and the score is
/// `100 × (1 − e^(−0.5 × ratio))`. Non-positive or non-finite inputs score 0.
pub fn calculate_comfort_score(net_income: f64, local_baseline: f64, multiplier: f64) -> f64 {
    let invalid = |v: f64| v.is_nan() || v <= 0.0;
    if invalid(net_income) || invalid(local_baseline) || local_baseline.is_infinite() {
        return 0.0;
    }

    let ratio = net_income / multiplier.max(1.0) / local_baseline;
    let score = 100.0 * (1.0 - (-STEEPNESS * ratio).exp());
    ((score * 10.0).round() / 10.0).clamp(0.0, 100.0)
}
