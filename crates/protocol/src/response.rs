use serde::{Deserialize, Serialize};

/// Response body of `GET /power_usage`.
///
/// Optional readings serialize as `null` rather than being omitted, so clients
/// always see the same set of keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUsageResponse {
    /// Estimated instantaneous draw in watts.
    pub power_usage: f64,
    /// Raw `get_throttled` bitmask, e.g. `"0x50000"`.
    pub throttled_state: Option<String>,
    pub core_voltage: Option<f64>,
    pub sdram_c_voltage: Option<f64>,
    pub sdram_i_voltage: Option<f64>,
    pub sdram_p_voltage: Option<f64>,
    pub cpu_frequency_mhz: Option<f64>,
    pub cpu_temperature: Option<f64>,
}

impl PowerUsageResponse {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

/// Body returned alongside a non-2xx status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
