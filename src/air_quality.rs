//! Air-quality scoring.
//!
//! Blends the deviation of relative humidity from an assumed-optimal indoor
//! baseline with the deviation of gas resistance from the calibrated burn-in
//! baseline into a single percentage. The shape of the heuristic is load
//! bearing: downstream threshold alerting depends on the exact values, so
//! the asymmetries documented below must not be smoothed over.

/// Assumed-optimal indoor relative humidity, percent.
pub const HUM_BASELINE: f64 = 40.0;

/// Fraction of the final score attributed to humidity; gas resistance
/// contributes the remaining 0.75.
pub const HUM_WEIGHTING: f64 = 0.25;

/// Compute the air-quality percentage for one sample.
///
/// `gas_baseline` is the burn-in baseline from [`crate::calibration`]; it
/// must be positive (a zero or negative baseline is invalid input and the
/// caller is responsible for rejecting it before scoring).
///
/// The humidity term peaks at its full 25-point share when humidity sits at
/// `HUM_BASELINE` and falls off linearly on either side, with different
/// slopes: above the baseline the offset is scaled against the headroom to
/// 100 %, below it against the distance to 0 %. The gas term saturates at
/// its full 75-point share whenever resistance is at or above the baseline
/// ("better than calibration" air) and scales proportionally below it. No
/// clamping is applied; typical indoor conditions keep the sum near
/// [0, 100], with 100 meaning both terms at their baselines.
pub fn score(gas_resistance: f64, humidity: f64, gas_baseline: f64) -> f64 {
    let hum_offset = humidity - HUM_BASELINE;
    let hum_score = if hum_offset > 0.0 {
        (100.0 - HUM_BASELINE - hum_offset) / (100.0 - HUM_BASELINE) * (HUM_WEIGHTING * 100.0)
    } else {
        (HUM_BASELINE + hum_offset) / HUM_BASELINE * (HUM_WEIGHTING * 100.0)
    };

    let gas_offset = gas_baseline - gas_resistance;
    let gas_score = if gas_offset > 0.0 {
        (gas_resistance / gas_baseline) * (100.0 - HUM_WEIGHTING * 100.0)
    } else {
        100.0 - HUM_WEIGHTING * 100.0
    };

    hum_score + gas_score
}
