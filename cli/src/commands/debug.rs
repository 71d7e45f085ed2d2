use std::fmt::Display;

use color_eyre::eyre::Result;
use pipower_platform::{
    parse_model, parse_throttled, Rail, SourceError, TelemetrySource, ThrottleFlags,
};

use crate::config::{config_path, Config};
use crate::data::{sample, DeviceProfile};
use crate::logging::log_dir;

fn show<T: Display>(label: &str, result: &Result<T, SourceError>) {
    match result {
        Ok(value) => println!("{label}: {}", value.to_string().trim_end()),
        Err(e) => println!("{label}: <unavailable: {e}>"),
    }
}

fn bound(mhz: Option<f64>) -> String {
    mhz.map_or_else(|| "unknown".to_string(), |mhz| format!("{mhz:.0}"))
}

pub fn run(config: &Config) -> Result<()> {
    println!("pipower debug information");
    println!("{}", "=".repeat(60));

    let source = config.telemetry_source();

    println!("\n--- Board ---");
    println!("Model file: {}", config.model_path.display());
    match source.model() {
        Ok(raw) => {
            println!("Raw model: {raw:?}");
            let model = parse_model(&raw);
            println!("Parsed model: {model}");
            match DeviceProfile::lookup(&model) {
                Ok(profile) => println!(
                    "Profile: idle {:.2}W, max {:.2}W",
                    profile.idle_power_watts, profile.max_power_watts
                ),
                Err(e) => println!("Profile: <{e}>"),
            }
        }
        Err(e) => println!("Model: <unavailable: {e}>"),
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        println!("\n--- Raw Telemetry ({}) ---", config.vcgencmd_path);
        show("measure_temp", &source.temperature().await);
        for rail in Rail::ALL {
            show(&format!("measure_volts {rail}"), &source.voltage(rail).await);
        }

        let throttled = source.throttled().await;
        show("get_throttled", &throttled);
        if let Some(flags) = throttled
            .ok()
            .and_then(|raw| parse_throttled(&raw).ok())
            .and_then(|hex| ThrottleFlags::from_hex(&hex))
        {
            for label in flags.active_labels() {
                println!("  - {label}");
            }
        }

        println!("\n--- CPU ---");
        match source.cpu_frequency().await {
            Ok(f) => println!(
                "Clock: {:.0} MHz (min {}, max {}, relative {:.2})",
                f.current_mhz,
                bound(f.min_mhz),
                bound(f.max_mhz),
                f.relative_position()
            ),
            Err(e) => println!("Clock: <unavailable: {e}>"),
        }

        let reading = sample(&source).await;
        match reading.cpu_usage_percent {
            Some(usage) => println!("Usage: {usage:.1}%"),
            None => println!("Usage: <unavailable>"),
        }
    });

    println!("\n--- Paths ---");
    println!("Config: {}", config_path().display());
    println!("Logs: {}", log_dir().display());

    println!("\n--- Current Config ---");
    println!("{}", toml::to_string_pretty(config)?);

    Ok(())
}
