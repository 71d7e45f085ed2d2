//! Telemetry source trait.

use std::future::Future;

use crate::error::SourceError;
use crate::types::{CpuFrequency, Rail};

/// Trait for everything pipower reads from the running system.
///
/// Firmware-backed accessors return the command's raw text so that parsing
/// lives in one place (see [`crate::parse_temperature`] and friends) and fake
/// sources can return literal strings. Each accessor fails independently.
pub trait TelemetrySource: Send + Sync {
    /// Raw contents of the board model description.
    fn model(&self) -> Result<String, SourceError>;

    /// Mean utilization over all cores, in percent.
    fn cpu_usage_percent(&self) -> impl Future<Output = Result<f64, SourceError>> + Send;

    /// Current clock and the governor's bounds.
    fn cpu_frequency(&self) -> impl Future<Output = Result<CpuFrequency, SourceError>> + Send;

    /// Raw `measure_temp` output, e.g. `temp=42.8'C`.
    fn temperature(&self) -> impl Future<Output = Result<String, SourceError>> + Send;

    /// Raw `measure_volts` output for one rail, e.g. `core=0.8500V`.
    fn voltage(&self, rail: Rail) -> impl Future<Output = Result<String, SourceError>> + Send;

    /// Raw `get_throttled` output, e.g. `throttled=0x50000`.
    fn throttled(&self) -> impl Future<Output = Result<String, SourceError>> + Send;
}
