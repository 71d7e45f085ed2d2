//! Per-model power envelopes.

use pipower_platform::{parse_model, CpuFrequency, SourceError, TelemetrySource};
use tracing::info;

use crate::data::estimator::{estimate, estimate_with_relative_clock, EstimateError};

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("power values for {0:?} are not defined")]
    UnknownModel(String),

    #[error("failed to read board model: {0}")]
    ModelRead(#[from] SourceError),
}

/// Measured idle and full-load draw of one board variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceProfile {
    pub model_name: &'static str,
    pub idle_power_watts: f64,
    pub max_power_watts: f64,
}

const fn profile(model_name: &'static str, idle: f64, max: f64) -> DeviceProfile {
    DeviceProfile {
        model_name,
        idle_power_watts: idle,
        max_power_watts: max,
    }
}

/// Known boards, keyed by the device-tree model string without its revision.
pub const PROFILES: &[DeviceProfile] = &[
    profile("Raspberry Pi 3 Model B Plus", 1.15, 3.6),
    profile("Raspberry Pi 4 Model B", 3.0, 6.0),
    profile("Raspberry Pi 2 Model B", 1.15, 3.0),
    profile("Raspberry Pi Zero", 0.1, 1.2),
    profile("Raspberry Pi Zero W", 0.3, 1.3),
    profile("Raspberry Pi 3 Model A Plus", 1.2, 3.8),
    profile("Raspberry Pi 5 Model B", 2.7, 6.4),
    profile("Raspberry Pi 1 Model B", 0.7, 2.5),
    profile("Raspberry Pi 1 Model A", 0.5, 2.0),
    profile("Raspberry Pi 1 Model B+", 0.7, 2.5),
    profile("Raspberry Pi 1 Model A+", 0.5, 2.0),
];

impl DeviceProfile {
    /// Exact-match lookup of a model name.
    pub fn lookup(model: &str) -> Result<&'static DeviceProfile, ProfileError> {
        PROFILES
            .iter()
            .find(|p| p.model_name == model)
            .ok_or_else(|| ProfileError::UnknownModel(model.to_string()))
    }

    /// Read the board model from `source` and resolve its profile.
    pub fn detect<S: TelemetrySource>(source: &S) -> Result<&'static DeviceProfile, ProfileError> {
        let raw = source.model()?;
        let model = parse_model(&raw);
        let profile = Self::lookup(&model)?;

        info!(
            model = profile.model_name,
            idle_watts = profile.idle_power_watts,
            max_watts = profile.max_power_watts,
            "Resolved device profile"
        );

        Ok(profile)
    }

    /// Estimated draw for this board at the given load.
    ///
    /// Without a clock reading, or with either governor bound unknown, the
    /// relative-frequency term is 1.0, which reduces to a usage-only linear
    /// model.
    pub fn estimate(
        &self,
        usage_percent: f64,
        frequency: Option<&CpuFrequency>,
    ) -> Result<f64, EstimateError> {
        match frequency.and_then(|f| Some((f.current_mhz, f.min_mhz?, f.max_mhz?))) {
            Some((current, min, max)) => estimate(
                usage_percent,
                current,
                min,
                max,
                self.idle_power_watts,
                self.max_power_watts,
            ),
            None => estimate_with_relative_clock(
                usage_percent,
                1.0,
                self.idle_power_watts,
                self.max_power_watts,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeSource;

    #[test]
    fn every_profile_has_ordered_envelope() {
        for p in PROFILES {
            assert!(p.idle_power_watts >= 0.0, "{}", p.model_name);
            assert!(p.max_power_watts >= p.idle_power_watts, "{}", p.model_name);
        }
    }

    #[test]
    fn model_names_are_unique() {
        for (i, a) in PROFILES.iter().enumerate() {
            for b in &PROFILES[i + 1..] {
                assert_ne!(a.model_name, b.model_name);
            }
        }
    }

    #[test]
    fn lookup_is_exact_match() {
        let pi4 = DeviceProfile::lookup("Raspberry Pi 4 Model B").unwrap();
        assert_eq!(pi4.idle_power_watts, 3.0);
        assert_eq!(pi4.max_power_watts, 6.0);

        // "Zero" must not match "Zero W" and vice versa
        assert_eq!(
            DeviceProfile::lookup("Raspberry Pi Zero W").unwrap().idle_power_watts,
            0.3
        );
        assert!(DeviceProfile::lookup("raspberry pi 4 model b").is_err());
    }

    #[test]
    fn lookup_unknown_model() {
        let err = DeviceProfile::lookup("Orange Pi 5").unwrap_err();
        assert!(matches!(err, ProfileError::UnknownModel(ref m) if m == "Orange Pi 5"));
        assert!(err.to_string().contains("Orange Pi 5"));
    }

    #[test]
    fn detect_strips_revision() {
        let source = FakeSource::healthy().with_model("Raspberry Pi 4 Model B Rev 1.4\n");
        let profile = DeviceProfile::detect(&source).unwrap();
        assert_eq!(profile.model_name, "Raspberry Pi 4 Model B");
    }

    #[test]
    fn detect_unreadable_model_is_model_read_error() {
        let source = FakeSource::healthy().without_model();
        assert!(matches!(
            DeviceProfile::detect(&source),
            Err(ProfileError::ModelRead(_))
        ));
    }

    #[test]
    fn estimate_without_frequency_is_usage_only() {
        let pi4 = DeviceProfile::lookup("Raspberry Pi 4 Model B").unwrap();
        let watts = pi4.estimate(50.0, None).unwrap();
        assert!((watts - 4.5).abs() < 1e-9);
    }

    #[test]
    fn estimate_scales_with_clock_position() {
        let pi4 = DeviceProfile::lookup("Raspberry Pi 4 Model B").unwrap();
        let freq = CpuFrequency {
            current_mhz: 1050.0,
            min_mhz: Some(600.0),
            max_mhz: Some(1500.0),
        };
        let watts = pi4.estimate(100.0, Some(&freq)).unwrap();
        assert!((watts - 4.5).abs() < 1e-9);
    }

    #[test]
    fn estimate_hits_envelope_endpoints() {
        for profile in PROFILES {
            let at_min = CpuFrequency {
                current_mhz: 600.0,
                min_mhz: Some(600.0),
                max_mhz: Some(1500.0),
            };
            let at_max = CpuFrequency {
                current_mhz: 1500.0,
                ..at_min
            };
            assert_eq!(
                profile.estimate(0.0, Some(&at_min)).unwrap(),
                profile.idle_power_watts
            );
            assert_eq!(
                profile.estimate(100.0, Some(&at_max)).unwrap(),
                profile.max_power_watts
            );
        }
    }

    #[test]
    fn estimate_with_unknown_bound_is_usage_only() {
        let pi4 = DeviceProfile::lookup("Raspberry Pi 4 Model B").unwrap();
        let freq = CpuFrequency {
            current_mhz: 600.0,
            min_mhz: None,
            max_mhz: Some(1500.0),
        };
        let watts = pi4.estimate(50.0, Some(&freq)).unwrap();
        assert!((watts - 4.5).abs() < 1e-9);
    }
}
