use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

/// Failure of a single telemetry read.
///
/// Every accessor on [`crate::TelemetrySource`] fails independently with one
/// of these; callers decide whether a failure is fatal.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} timed out after {timeout:?}")]
    Timeout { program: String, timeout: Duration },

    #[error("{program} exited with {status}: {stderr}")]
    CommandFailed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("unexpected output {output:?}, expected {expected}")]
    Parse {
        output: String,
        expected: &'static str,
    },

    #[error("{0} is not available on this system")]
    Unavailable(&'static str),
}

impl SourceError {
    pub(crate) fn parse(output: &str, expected: &'static str) -> Self {
        SourceError::Parse {
            output: output.trim().to_string(),
            expected,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SourceError::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns true if the read gave up waiting on an external command.
    pub fn is_timeout(&self) -> bool {
        matches!(self, SourceError::Timeout { .. })
    }
}
