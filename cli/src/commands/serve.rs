use color_eyre::eyre::Result;
use tracing::{error, warn};

use crate::config::Config;
use crate::data::DeviceProfile;
use crate::server::{run_server, AppState};

pub fn run(config: Config) -> Result<()> {
    let source = config.telemetry_source();
    if !source.is_supported() {
        warn!(path = %config.model_path.display(), "Model file not found, is this a Raspberry Pi?");
    }

    let profile = match DeviceProfile::detect(&source) {
        Ok(profile) => profile,
        Err(e) => {
            error!(error = %e, "Refusing to start");
            return Err(e.into());
        }
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_server(&config, AppState::new(profile, source)))?;
    Ok(())
}
