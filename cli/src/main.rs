mod cli;
mod commands;
mod config;
mod data;
mod logging;
mod server;

#[cfg(test)]
mod testing;

use clap::Parser;
use color_eyre::eyre::Result;

use cli::{Cli, Commands};
use config::{Config, LogLevel};
use logging::LogMode;

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let log_level_override = cli.log_level.as_deref().map(LogLevel::from_str);

    if let Some(Commands::Config { path, reset }) = cli.command {
        let _guard = logging::init(LogLevel::default(), LogMode::Stderr, log_level_override);
        return commands::config::run(cli.config.as_deref(), path, reset);
    }

    let mut config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Pipe {
            samples,
            interval,
            compact,
        }) => {
            let mode = if config.log_to_file {
                LogMode::File
            } else {
                LogMode::Stderr
            };
            let _guard = logging::init(config.log_level, mode, log_level_override);
            commands::pipe::run(&config, samples, interval, compact)
        }
        Some(Commands::Debug) => {
            let _guard = logging::init(config.log_level, LogMode::Stderr, log_level_override);
            commands::debug::run(&config)
        }
        Some(Commands::Serve { host, port }) => {
            config.merge_with_args(host, port);
            serve(config, log_level_override)
        }
        Some(Commands::Config { .. }) | None => serve(config, log_level_override),
    }
}

fn serve(config: Config, log_level_override: Option<LogLevel>) -> Result<()> {
    let mode = if config.log_to_file {
        LogMode::Both
    } else {
        LogMode::Stderr
    };
    let _guard = logging::init(config.log_level, mode, log_level_override);
    commands::serve::run(config)
}
