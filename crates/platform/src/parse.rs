//! Parsers for raw `vcgencmd` and device-tree output.

use crate::error::SourceError;

const REVISION_MARKER: &str = "Rev";

/// Extract the board model from `/proc/device-tree/model`.
///
/// The raw value carries a revision suffix (`Rev 1.4`) and a NUL terminator,
/// neither of which appear in profile keys.
pub fn parse_model(raw: &str) -> String {
    let without_revision = match raw.find(REVISION_MARKER) {
        Some(idx) => &raw[..idx],
        None => raw,
    };
    without_revision
        .trim_matches(|c: char| c.is_whitespace() || c == '\0')
        .to_string()
}

/// Parse `vcgencmd measure_temp` output (`temp=42.8'C`) into degrees Celsius.
pub fn parse_temperature(raw: &str) -> Result<f64, SourceError> {
    const EXPECTED: &str = "temp=<float>'C";

    raw.trim()
        .strip_prefix("temp=")
        .and_then(|s| s.strip_suffix("'C"))
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| SourceError::parse(raw, EXPECTED))
}

/// Parse `vcgencmd measure_volts <rail>` output (`core=0.8500V`) into volts.
///
/// Firmware versions disagree on the key (`volt=` vs the rail name), so only
/// the value after `=` is inspected.
pub fn parse_voltage(raw: &str) -> Result<f64, SourceError> {
    const EXPECTED: &str = "<rail>=<float>V";

    raw.trim()
        .split_once('=')
        .and_then(|(_, value)| value.strip_suffix('V'))
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| SourceError::parse(raw, EXPECTED))
}

/// Extract the hex bitmask from `vcgencmd get_throttled` output.
///
/// The value is passed through as-is; decoding is left to the caller (see
/// [`crate::ThrottleFlags`]).
pub fn parse_throttled(raw: &str) -> Result<String, SourceError> {
    const EXPECTED: &str = "throttled=<hex>";

    raw.trim()
        .split_once('=')
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| SourceError::parse(raw, EXPECTED))
}
