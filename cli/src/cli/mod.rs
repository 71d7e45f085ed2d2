use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Serve GET /power_usage over HTTP(S) (default)
    Serve {
        /// Address to bind (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print power usage records as JSON (suitable for piping)
    #[command(alias = "raw")]
    Pipe {
        /// Number of samples to output (0 = infinite)
        #[arg(short, long, default_value_t = 0)]
        samples: u32,

        /// Delay between samples in milliseconds
        #[arg(short, long, default_value_t = 1000)]
        interval: u64,

        /// Compact JSON output (one line per sample)
        #[arg(short, long)]
        compact: bool,
    },

    /// Print raw telemetry and resolved settings
    Debug,

    /// Show configuration
    Config {
        /// Print config file path
        #[arg(long)]
        path: bool,

        /// Reset config to defaults
        #[arg(long)]
        reset: bool,
    },
}

/// Estimated power draw and health telemetry for Raspberry Pi boards
#[derive(Debug, Parser)]
#[command(name = "pipower", version, verbatim_doc_comment)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_parses() {
        let cli = Cli::try_parse_from(["pipower"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn serve_overrides_parse() {
        let cli =
            Cli::try_parse_from(["pipower", "serve", "--host", "0.0.0.0", "-p", "8080"]).unwrap();
        match cli.command {
            Some(Commands::Serve { host, port }) => {
                assert_eq!(host.as_deref(), Some("0.0.0.0"));
                assert_eq!(port, Some(8080));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn pipe_compact_short_flag_parses() {
        let cli = Cli::try_parse_from(["pipower", "pipe", "-c", "-s", "1"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Pipe {
                samples: 1,
                compact: true,
                ..
            })
        ));
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = Cli::try_parse_from([
            "pipower",
            "raw",
            "--samples",
            "2",
            "--config",
            "/etc/pipower.toml",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Pipe { samples: 2, .. })
        ));
        assert_eq!(cli.config, Some(PathBuf::from("/etc/pipower.toml")));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
    }
}
