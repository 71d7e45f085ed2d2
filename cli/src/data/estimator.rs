//! Power estimation from CPU load and clock scaling.
//!
//! The model interpolates between a board's idle and maximum draw using the
//! product of two fractions: CPU utilization and the clock's position between
//! its governor bounds. It is not physically exact but it is monotonic and
//! stays within `[idle, max]` for in-range inputs.

use pipower_platform::CpuFrequency;

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum EstimateError {
    #[error("usage percentage should be between 0 and 100, got {0}")]
    InvalidUsage(f64),
}

/// Estimate draw in watts.
///
/// `freq_max <= freq_min` treats the clock term as 1.0 instead of dividing by
/// zero, and a current clock outside the bounds is clamped. A non-finite
/// clock also gives 1.0.
pub fn estimate(
    usage_percent: f64,
    freq_current: f64,
    freq_min: f64,
    freq_max: f64,
    idle_power: f64,
    max_power: f64,
) -> Result<f64, EstimateError> {
    let frequency = CpuFrequency {
        current_mhz: freq_current,
        min_mhz: Some(freq_min),
        max_mhz: Some(freq_max),
    };
    estimate_with_relative_clock(
        usage_percent,
        frequency.relative_position(),
        idle_power,
        max_power,
    )
}

/// Estimate draw from usage and an already computed clock position in [0, 1].
pub fn estimate_with_relative_clock(
    usage_percent: f64,
    relative_clock: f64,
    idle_power: f64,
    max_power: f64,
) -> Result<f64, EstimateError> {
    if !(0.0..=100.0).contains(&usage_percent) {
        return Err(EstimateError::InvalidUsage(usage_percent));
    }

    let load = (usage_percent / 100.0) * relative_clock;

    // Same as idle + (max - idle) * load, but exact at load == 0 and load == 1.
    Ok(idle_power * (1.0 - load) + max_power * load)
}
