use pipower_platform::Rail;
use pipower_protocol::PowerUsageResponse;

use crate::data::estimator::EstimateError;
use crate::data::profile::DeviceProfile;
use crate::data::sampler::LiveSample;

#[derive(Debug, thiserror::Error)]
pub enum AggregateError {
    #[error("cpu usage is unavailable")]
    UsageUnavailable,

    #[error(transparent)]
    Estimate(#[from] EstimateError),
}

/// Estimate power for `sample` and assemble the response record.
pub fn aggregate(
    profile: &DeviceProfile,
    sample: &LiveSample,
) -> Result<PowerUsageResponse, AggregateError> {
    let usage = sample
        .cpu_usage_percent
        .ok_or(AggregateError::UsageUnavailable)?;
    let power_usage = profile.estimate(usage, sample.cpu_frequency.as_ref())?;
    Ok(assemble(power_usage, sample))
}

pub fn assemble(power_usage: f64, sample: &LiveSample) -> PowerUsageResponse {
    PowerUsageResponse {
        power_usage,
        throttled_state: sample.throttled_flags.clone(),
        core_voltage: sample.voltage(Rail::Core),
        sdram_c_voltage: sample.voltage(Rail::SdramC),
        sdram_i_voltage: sample.voltage(Rail::SdramI),
        sdram_p_voltage: sample.voltage(Rail::SdramP),
        cpu_frequency_mhz: sample.cpu_frequency_mhz(),
        cpu_temperature: sample.cpu_temp_celsius,
    }
}
