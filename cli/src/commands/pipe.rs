use std::time::Duration;

use color_eyre::eyre::Result;
use serde_json::json;

use crate::config::Config;
use crate::data::{aggregate, sample, DeviceProfile};

pub fn run(config: &Config, samples: u32, interval: u64, compact: bool) -> Result<()> {
    let source = config.telemetry_source();
    let profile = DeviceProfile::detect(&source)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let mut counter = 0u32;

        loop {
            let reading = sample(&source).await;
            let timestamp = chrono::Utc::now().to_rfc3339();

            let doc = match aggregate(profile, &reading) {
                Ok(record) => json!({
                    "timestamp": timestamp,
                    "model": profile.model_name,
                    "power": record,
                }),
                Err(e) => json!({
                    "timestamp": timestamp,
                    "model": profile.model_name,
                    "error": e.to_string(),
                }),
            };

            if compact {
                println!("{}", serde_json::to_string(&doc)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&doc)?);
            }

            counter += 1;
            if samples > 0 && counter >= samples {
                break;
            }

            tokio::time::sleep(Duration::from_millis(interval)).await;
        }

        Ok::<_, color_eyre::Report>(())
    })
}
