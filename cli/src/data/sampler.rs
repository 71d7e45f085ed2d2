use std::collections::HashMap;

use pipower_platform::{
    parse_temperature, parse_throttled, parse_voltage, CpuFrequency, Rail, SourceError,
    TelemetrySource,
};
use tracing::{debug, warn};

/// One pass over every telemetry accessor. Any field may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiveSample {
    pub cpu_usage_percent: Option<f64>,
    pub cpu_frequency: Option<CpuFrequency>,
    pub cpu_temp_celsius: Option<f64>,
    pub throttled_flags: Option<String>,
    pub voltages: HashMap<Rail, f64>,
}

impl LiveSample {
    pub fn voltage(&self, rail: Rail) -> Option<f64> {
        self.voltages.get(&rail).copied()
    }

    pub fn cpu_frequency_mhz(&self) -> Option<f64> {
        self.cpu_frequency.map(|f| f.current_mhz)
    }
}

/// Read every accessor concurrently. A failing accessor is logged and leaves
/// its field empty without affecting the others.
pub async fn sample<S: TelemetrySource>(source: &S) -> LiveSample {
    let (usage, frequency, temperature, throttled, core, sdram_c, sdram_i, sdram_p) = tokio::join!(
        source.cpu_usage_percent(),
        source.cpu_frequency(),
        read_temperature(source),
        read_throttled(source),
        read_voltage(source, Rail::Core),
        read_voltage(source, Rail::SdramC),
        read_voltage(source, Rail::SdramI),
        read_voltage(source, Rail::SdramP),
    );

    let voltages = [
        (Rail::Core, core),
        (Rail::SdramC, sdram_c),
        (Rail::SdramI, sdram_i),
        (Rail::SdramP, sdram_p),
    ]
    .into_iter()
    .filter_map(|(rail, volts)| volts.map(|v| (rail, v)))
    .collect();

    let sample = LiveSample {
        cpu_usage_percent: available("cpu usage", usage),
        cpu_frequency: available("cpu frequency", frequency),
        cpu_temp_celsius: temperature,
        throttled_flags: throttled,
        voltages,
    };

    debug!(?sample, "Sampled telemetry");
    sample
}

fn available<T>(what: &'static str, result: Result<T, SourceError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(reading = what, error = %e, "Telemetry reading unavailable");
            None
        }
    }
}

async fn read_temperature<S: TelemetrySource>(source: &S) -> Option<f64> {
    let parsed = source
        .temperature()
        .await
        .and_then(|raw| parse_temperature(&raw));
    available("temperature", parsed)
}

async fn read_throttled<S: TelemetrySource>(source: &S) -> Option<String> {
    let parsed = source
        .throttled()
        .await
        .and_then(|raw| parse_throttled(&raw));
    available("throttled", parsed)
}

async fn read_voltage<S: TelemetrySource>(source: &S, rail: Rail) -> Option<f64> {
    match source.voltage(rail).await.and_then(|raw| parse_voltage(&raw)) {
        Ok(volts) => Some(volts),
        Err(e) => {
            warn!(rail = %rail, error = %e, "Voltage reading unavailable");
            None
        }
    }
}
