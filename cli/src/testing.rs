//! Scripted telemetry source for unit tests.

use pipower_platform::{CpuFrequency, Rail, SourceError, TelemetrySource};

#[derive(Debug, Clone)]
pub struct FakeSource {
    model: Option<String>,
    usage: Option<f64>,
    frequency: Option<CpuFrequency>,
    temperature: Option<String>,
    volts: Option<String>,
    failing_rail: Option<Rail>,
    throttled: Option<String>,
}

impl FakeSource {
    /// A Pi 4 at 1500 MHz (600-1500), half loaded, every reading available.
    pub fn healthy() -> Self {
        Self {
            model: Some("Raspberry Pi 4 Model B Rev 1.4\0".to_string()),
            usage: Some(50.0),
            frequency: Some(CpuFrequency {
                current_mhz: 1500.0,
                min_mhz: Some(600.0),
                max_mhz: Some(1500.0),
            }),
            temperature: Some("temp=42.8'C\n".to_string()),
            volts: Some("volt=0.8500V\n".to_string()),
            failing_rail: None,
            throttled: Some("throttled=0x50000\n".to_string()),
        }
    }

    pub fn with_model(mut self, raw: &str) -> Self {
        self.model = Some(raw.to_string());
        self
    }

    pub fn without_model(mut self) -> Self {
        self.model = None;
        self
    }

    pub fn with_usage(mut self, usage: Option<f64>) -> Self {
        self.usage = usage;
        self
    }

    pub fn without_frequency(mut self) -> Self {
        self.frequency = None;
        self
    }

    /// Keep the current clock but drop the governor bounds.
    pub fn without_clock_bounds(mut self) -> Self {
        if let Some(frequency) = self.frequency.as_mut() {
            frequency.min_mhz = None;
            frequency.max_mhz = None;
        }
        self
    }

    pub fn without_temperature(mut self) -> Self {
        self.temperature = None;
        self
    }

    pub fn with_temperature(mut self, raw: &str) -> Self {
        self.temperature = Some(raw.to_string());
        self
    }

    pub fn with_failing_rail(mut self, rail: Rail) -> Self {
        self.failing_rail = Some(rail);
        self
    }

    pub fn without_throttled(mut self) -> Self {
        self.throttled = None;
        self
    }
}

fn scripted<T: Clone>(value: &Option<T>, what: &'static str) -> Result<T, SourceError> {
    value.clone().ok_or(SourceError::Unavailable(what))
}

impl TelemetrySource for FakeSource {
    fn model(&self) -> Result<String, SourceError> {
        scripted(&self.model, "model")
    }

    async fn cpu_usage_percent(&self) -> Result<f64, SourceError> {
        scripted(&self.usage, "cpu usage")
    }

    async fn cpu_frequency(&self) -> Result<CpuFrequency, SourceError> {
        scripted(&self.frequency, "cpu frequency")
    }

    async fn temperature(&self) -> Result<String, SourceError> {
        scripted(&self.temperature, "temperature")
    }

    async fn voltage(&self, rail: Rail) -> Result<String, SourceError> {
        if self.failing_rail == Some(rail) {
            return Err(SourceError::Timeout {
                program: "vcgencmd".to_string(),
                timeout: std::time::Duration::from_secs(2),
            });
        }
        scripted(&self.volts, "voltage")
    }

    async fn throttled(&self) -> Result<String, SourceError> {
        scripted(&self.throttled, "throttled")
    }
}
