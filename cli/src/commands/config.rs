use std::path::Path;

use color_eyre::eyre::Result;

use crate::config::{config_path, Config};

pub fn run(config_file: Option<&Path>, path: bool, reset: bool) -> Result<()> {
    let config_file = config_file.map_or_else(config_path, Path::to_path_buf);

    if path {
        println!("{}", config_file.display());
        return Ok(());
    }

    if reset {
        Config::default().save(&config_file)?;
        println!("Config reset to defaults at: {}", config_file.display());
        return Ok(());
    }

    let config = if config_file.exists() {
        Config::load(Some(&config_file))?
    } else {
        Config::default()
    };
    println!("Config file: {}", config_file.display());
    println!();
    println!("{}", toml::to_string_pretty(&config)?);

    Ok(())
}
