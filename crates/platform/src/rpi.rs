use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use sysinfo::{CpuRefreshKind, RefreshKind, System, MINIMUM_CPU_UPDATE_INTERVAL};
use tracing::debug;

use crate::command::run_command;
use crate::error::SourceError;
use crate::source::TelemetrySource;
use crate::types::{CpuFrequency, Rail};

const MODEL_PATH: &str = "/proc/device-tree/model";
const CPUFREQ_PATH: &str = "/sys/devices/system/cpu/cpu0/cpufreq";
const VCGENCMD: &str = "vcgencmd";
const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_millis(500);
const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(2);
const KHZ_PER_MHZ: f64 = 1000.0;

/// Telemetry read from a live Raspberry Pi.
///
/// CPU usage and clock come from sysinfo and cpufreq sysfs; temperature,
/// voltages and throttling come from `vcgencmd`.
#[derive(Debug, Clone)]
pub struct RaspberryPi {
    model_path: PathBuf,
    cpufreq_path: PathBuf,
    vcgencmd: String,
    sample_interval: Duration,
    command_timeout: Duration,
}

impl Default for RaspberryPi {
    fn default() -> Self {
        Self::new()
    }
}

impl RaspberryPi {
    pub fn new() -> Self {
        Self {
            model_path: PathBuf::from(MODEL_PATH),
            cpufreq_path: PathBuf::from(CPUFREQ_PATH),
            vcgencmd: VCGENCMD.to_string(),
            sample_interval: DEFAULT_SAMPLE_INTERVAL,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = path.into();
        self
    }

    pub fn with_cpufreq_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cpufreq_path = path.into();
        self
    }

    pub fn with_vcgencmd(mut self, program: impl Into<String>) -> Self {
        self.vcgencmd = program.into();
        self
    }

    /// Window over which CPU usage is measured. Never shorter than what
    /// sysinfo needs between two refreshes.
    pub fn with_sample_interval(mut self, interval: Duration) -> Self {
        self.sample_interval = interval.max(MINIMUM_CPU_UPDATE_INTERVAL);
        self
    }

    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Check if this looks like a board with firmware tooling.
    pub fn is_supported(&self) -> bool {
        self.model_path.exists()
    }

    async fn run_vcgencmd(&self, args: &[&str]) -> Result<String, SourceError> {
        run_command(&self.vcgencmd, args, self.command_timeout).await
    }

    fn read_cpufreq_mhz(&self, names: &[&str]) -> Result<f64, SourceError> {
        let mut last_err = SourceError::Unavailable("cpufreq");
        for name in names {
            match read_khz(&self.cpufreq_path.join(name)) {
                Ok(khz) => return Ok(khz / KHZ_PER_MHZ),
                Err(e) => last_err = e,
            }
        }
        Err(last_err)
    }

    /// A governor bound, or None if no candidate file could be read.
    fn clock_bound(&self, names: &[&str]) -> Option<f64> {
        match self.read_cpufreq_mhz(names) {
            Ok(mhz) => Some(mhz),
            Err(e) => {
                debug!(error = %e, "Clock bound unavailable");
                None
            }
        }
    }

    fn current_clock_mhz(&self) -> Result<f64, SourceError> {
        let mut system = System::new_with_specifics(
            RefreshKind::nothing().with_cpu(CpuRefreshKind::nothing().with_frequency()),
        );
        system.refresh_cpu_frequency();

        let frequencies: Vec<u64> = system
            .cpus()
            .iter()
            .map(|cpu| cpu.frequency())
            .filter(|mhz| *mhz > 0)
            .collect();

        if frequencies.is_empty() {
            return self.read_cpufreq_mhz(&["scaling_cur_freq", "cpuinfo_cur_freq"]);
        }

        let total: u64 = frequencies.iter().sum();
        Ok(total as f64 / frequencies.len() as f64)
    }
}

impl TelemetrySource for RaspberryPi {
    fn model(&self) -> Result<String, SourceError> {
        fs::read_to_string(&self.model_path).map_err(|e| SourceError::io(&self.model_path, e))
    }

    async fn cpu_usage_percent(&self) -> Result<f64, SourceError> {
        let mut system = System::new_with_specifics(
            RefreshKind::nothing().with_cpu(CpuRefreshKind::nothing().with_cpu_usage()),
        );
        system.refresh_cpu_usage();
        tokio::time::sleep(self.sample_interval).await;
        system.refresh_cpu_usage();

        let cpus = system.cpus();
        if cpus.is_empty() {
            return Err(SourceError::Unavailable("cpu usage"));
        }

        let total: f32 = cpus.iter().map(|cpu| cpu.cpu_usage()).sum();
        Ok(f64::from(total / cpus.len() as f32))
    }

    async fn cpu_frequency(&self) -> Result<CpuFrequency, SourceError> {
        Ok(CpuFrequency {
            current_mhz: self.current_clock_mhz()?,
            min_mhz: self.clock_bound(&["scaling_min_freq", "cpuinfo_min_freq"]),
            max_mhz: self.clock_bound(&["scaling_max_freq", "cpuinfo_max_freq"]),
        })
    }

    async fn temperature(&self) -> Result<String, SourceError> {
        self.run_vcgencmd(&["measure_temp"]).await
    }

    async fn voltage(&self, rail: Rail) -> Result<String, SourceError> {
        self.run_vcgencmd(&["measure_volts", rail.as_str()]).await
    }

    async fn throttled(&self) -> Result<String, SourceError> {
        self.run_vcgencmd(&["get_throttled"]).await
    }
}

fn read_khz(path: &Path) -> Result<f64, SourceError> {
    let content = fs::read_to_string(path).map_err(|e| SourceError::io(path, e))?;
    content
        .trim()
        .parse::<f64>()
        .map_err(|_| SourceError::parse(&content, "frequency in kHz"))
}
