use std::path::PathBuf;
use std::sync::OnceLock;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{runtime_dir, LogLevel};

const LOG_PREFIX: &str = "pipower";
const MAX_LOG_FILES: usize = 7;

static INIT: OnceLock<()> = OnceLock::new();

/// Where log records go. `pipe` writes JSON to stdout, so it never mixes
/// logs into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    File,
    Stderr,
    Both,
}

impl LogMode {
    fn writes_file(self) -> bool {
        matches!(self, LogMode::File | LogMode::Both)
    }

    fn writes_stderr(self) -> bool {
        matches!(self, LogMode::Stderr | LogMode::Both)
    }
}

/// Keeps the non-blocking file writer alive. Drop it last.
pub struct LogGuard {
    _guard: Option<WorkerGuard>,
}

/// Install the global subscriber once. Later calls are no-ops.
///
/// If the log directory cannot be used, records go to stderr instead.
pub fn init(level: LogLevel, mode: LogMode, cli_override: Option<LogLevel>) -> LogGuard {
    let mut guard = None;

    INIT.get_or_init(|| {
        let Some(level) = cli_override.unwrap_or(level).as_tracing_level() else {
            return;
        };

        let file_layer = mode
            .writes_file()
            .then(rolling_appender)
            .flatten()
            .map(|appender| {
                let (writer, worker) = tracing_appender::non_blocking(appender);
                guard = Some(worker);
                fmt::layer()
                    .with_writer(writer)
                    .with_timer(UtcTime::rfc_3339())
                    .with_ansi(false)
                    .with_file(true)
                    .with_line_number(true)
            });

        let stderr_layer = (mode.writes_stderr() || file_layer.is_none()).then(|| {
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_timer(UtcTime::rfc_3339())
        });

        tracing_subscriber::registry()
            .with(build_env_filter(level))
            .with(file_layer)
            .with(stderr_layer)
            .init();
    });

    LogGuard { _guard: guard }
}

fn build_env_filter(level: Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy()
        .add_directive("hyper=warn".parse().unwrap())
        .add_directive("hyper_util=warn".parse().unwrap())
        .add_directive("rustls=warn".parse().unwrap())
}

fn rolling_appender() -> Option<RollingFileAppender> {
    let dir = log_dir();
    if let Err(e) = std::fs::create_dir_all(&dir) {
        eprintln!("Warning: cannot create log directory {}: {e}", dir.display());
        return None;
    }

    match RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_PREFIX)
        .filename_suffix("log")
        .max_log_files(MAX_LOG_FILES)
        .build(&dir)
    {
        Ok(appender) => Some(appender),
        Err(e) => {
            eprintln!("Warning: cannot open log file in {}: {e}", dir.display());
            None
        }
    }
}

pub fn log_dir() -> PathBuf {
    runtime_dir()
}
