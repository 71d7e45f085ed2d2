//! Shared types for telemetry readings.

use std::fmt;

/// A named voltage supply domain reported by `vcgencmd measure_volts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rail {
    /// VideoCore / ARM core supply
    Core,
    /// SDRAM controller supply
    SdramC,
    /// SDRAM I/O supply
    SdramI,
    /// SDRAM physical supply
    SdramP,
}

impl Rail {
    /// Every rail, in the order the HTTP response lists them.
    pub const ALL: [Rail; 4] = [Rail::Core, Rail::SdramC, Rail::SdramI, Rail::SdramP];

    /// Returns the argument `vcgencmd measure_volts` expects for this rail.
    pub fn as_str(&self) -> &'static str {
        match self {
            Rail::Core => "core",
            Rail::SdramC => "sdram_c",
            Rail::SdramI => "sdram_i",
            Rail::SdramP => "sdram_p",
        }
    }
}

impl fmt::Display for Rail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// CPU clock reading in MHz.
///
/// The governor bounds are read from separate files and either may be
/// missing without losing the current clock.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CpuFrequency {
    /// Current clock, averaged over all cores.
    pub current_mhz: f64,

    /// Lowest clock the frequency governor may select.
    pub min_mhz: Option<f64>,

    /// Highest clock the frequency governor may select.
    pub max_mhz: Option<f64>,
}

impl CpuFrequency {
    /// Position of the current clock between min and max, clamped to [0, 1].
    ///
    /// A CPU with a single operating point (`max <= min`) always runs at its
    /// top clock, so the position is 1.0. The same applies when a bound is
    /// unknown or any value is not finite.
    pub fn relative_position(&self) -> f64 {
        let (Some(min), Some(max)) = (self.min_mhz, self.max_mhz) else {
            return 1.0;
        };
        let span = max - min;
        if span <= 0.0 || !span.is_finite() {
            return 1.0;
        }
        let position = (self.current_mhz - min) / span;
        if position.is_finite() {
            position.clamp(0.0, 1.0)
        } else {
            1.0
        }
    }
}

/// Decoded `get_throttled` bitmask.
///
/// Bits 0-3 describe the current state, bits 16-19 whether the condition has
/// occurred since boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ThrottleFlags(pub u32);

impl ThrottleFlags {
    const LABELS: [(u32, &'static str); 8] = [
        (1 << 0, "under-voltage detected"),
        (1 << 1, "arm frequency capped"),
        (1 << 2, "currently throttled"),
        (1 << 3, "soft temperature limit active"),
        (1 << 16, "under-voltage has occurred"),
        (1 << 17, "arm frequency capping has occurred"),
        (1 << 18, "throttling has occurred"),
        (1 << 19, "soft temperature limit has occurred"),
    ];

    /// Parse a hex string such as `0x50000`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex
            .trim()
            .trim_start_matches("0x")
            .trim_start_matches("0X");
        u32::from_str_radix(digits, 16).ok().map(ThrottleFlags)
    }

    pub fn is_under_voltage(&self) -> bool {
        self.0 & 1 != 0
    }

    pub fn is_throttled(&self) -> bool {
        self.0 & (1 << 2) != 0
    }

    /// Returns a human-readable label for every bit that is set.
    pub fn active_labels(&self) -> Vec<&'static str> {
        Self::LABELS
            .iter()
            .filter(|(bit, _)| self.0 & bit != 0)
            .map(|(_, label)| *label)
            .collect()
    }
}

impl fmt::Display for ThrottleFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rail_names() {
        assert_eq!(Rail::Core.as_str(), "core");
        assert_eq!(Rail::SdramC.as_str(), "sdram_c");
        assert_eq!(Rail::SdramI.as_str(), "sdram_i");
        assert_eq!(Rail::SdramP.as_str(), "sdram_p");
        assert_eq!(Rail::SdramC.to_string(), "sdram_c");
    }

    #[test]
    fn test_relative_position_in_range() {
        let freq = CpuFrequency {
            current_mhz: 1000.0,
            min_mhz: Some(600.0),
            max_mhz: Some(1400.0),
        };
        assert!((freq.relative_position() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_relative_position_degenerate_range_is_one() {
        let freq = CpuFrequency {
            current_mhz: 700.0,
            min_mhz: Some(700.0),
            max_mhz: Some(700.0),
        };
        assert_eq!(freq.relative_position(), 1.0);
    }

    #[test]
    fn test_relative_position_clamps_out_of_range_clock() {
        let above = CpuFrequency {
            current_mhz: 1600.0,
            min_mhz: Some(600.0),
            max_mhz: Some(1500.0),
        };
        let below = CpuFrequency {
            current_mhz: 400.0,
            ..above
        };
        assert_eq!(above.relative_position(), 1.0);
        assert_eq!(below.relative_position(), 0.0);
    }

    #[test]
    fn test_relative_position_missing_bound_is_one() {
        let no_min = CpuFrequency {
            current_mhz: 800.0,
            min_mhz: None,
            max_mhz: Some(1500.0),
        };
        let no_max = CpuFrequency {
            min_mhz: Some(600.0),
            max_mhz: None,
            ..no_min
        };
        assert_eq!(no_min.relative_position(), 1.0);
        assert_eq!(no_max.relative_position(), 1.0);
    }

    #[test]
    fn test_relative_position_nan_clock_is_one() {
        let freq = CpuFrequency {
            current_mhz: f64::NAN,
            min_mhz: Some(600.0),
            max_mhz: Some(1500.0),
        };
        assert_eq!(freq.relative_position(), 1.0);

        let infinite_min = CpuFrequency {
            current_mhz: 1000.0,
            min_mhz: Some(f64::NEG_INFINITY),
            max_mhz: Some(1500.0),
        };
        assert_eq!(infinite_min.relative_position(), 1.0);
    }

    #[test]
    fn test_throttle_flags_decode() {
        let flags = ThrottleFlags::from_hex("0x50005").unwrap();
        assert!(flags.is_under_voltage());
        assert!(flags.is_throttled());
        assert_eq!(
            flags.active_labels(),
            vec![
                "under-voltage detected",
                "currently throttled",
                "under-voltage has occurred",
                "throttling has occurred",
            ]
        );
        assert_eq!(flags.to_string(), "0x50005");
    }

    #[test]
    fn test_throttle_flags_rejects_garbage() {
        assert_eq!(ThrottleFlags::from_hex("0xZZ"), None);
        assert_eq!(ThrottleFlags::from_hex("0x0"), Some(ThrottleFlags(0)));
        assert!(ThrottleFlags(0).active_labels().is_empty());
    }
}
