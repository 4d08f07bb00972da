//! Diagnostics: console logging and the append-only error log.
//!
//! Console output goes to stderr, filtered by verbosity or `RUST_LOG`. Errors are additionally
//! appended to a log file, timestamped, with their full cause chain. Nothing in the pipeline ever
//! reads that file back.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{Level, Subscriber};
use tracing_subscriber::{
    filter::{Filtered, LevelFilter},
    fmt,
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

use crate::PipelineError;

/// Where errors are logged unless configured otherwise, relative to the working directory.
pub const DEFAULT_ERROR_LOG: &str = "logs/log.txt";

/// Configuration for logging behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Console log level.
    pub level: Level,
    /// Error log file, disabled when `None`.
    pub error_log: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            error_log: Some(PathBuf::from(DEFAULT_ERROR_LOG)),
        }
    }
}

impl LogConfig {
    /// Create a `LogConfig` from CLI verbosity count.
    ///
    /// - 0 (no `-v`): warn level
    /// - 1 (`-v`): info level
    /// - 2 (`-vv`): debug level
    /// - 3+ (`-vvv`): trace level
    #[must_use]
    pub fn from_verbosity(verbosity: u8) -> Self {
        let level = match verbosity {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        };
        Self {
            level,
            ..Default::default()
        }
    }

    /// Set the error log path.
    #[must_use]
    pub fn with_error_log(mut self, path: Option<PathBuf>) -> Self {
        self.error_log = path;
        self
    }
}

/// Initialize the global tracing subscriber. Must be called at most once.
///
/// # Errors
///
/// Returns an error if the error log cannot be opened, or if a subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> io::Result<()> {
    let console = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .with_filter(build_env_filter(config.level));

    let error_log = match &config.error_log {
        Some(path) => Some(error_log_layer(path)?),
        None => None,
    };

    tracing_subscriber::registry()
        .with(console)
        .with(error_log)
        .try_init()
        .map_err(io::Error::other)
}

/// Layer writing ERROR events, without colors, to a file opened in append mode.
pub type ErrorLogLayer<S> = Filtered<
    fmt::Layer<S, fmt::format::DefaultFields, fmt::format::Format, Mutex<File>>,
    LevelFilter,
    S,
>;

/// Open `path` for appending, creating its parent directory, and log errors to it.
pub fn error_log_layer<S>(path: &Path) -> io::Result<ErrorLogLayer<S>>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_filter(LevelFilter::ERROR))
}

/// Log a failed run with every underlying cause.
pub fn report_failure(error: &PipelineError) {
    tracing::error!(error = %error, trace = %error_chain(error), "pipeline run failed");
}

/// Render an error and all of its sources, outermost first.
pub fn error_chain(error: &dyn std::error::Error) -> String {
    let mut chain = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        chain.push_str(": ");
        chain.push_str(&cause.to_string());
        source = cause.source();
    }
    chain
}

/// Build an `EnvFilter` from the given level, respecting `RUST_LOG` env var.
fn build_env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        // Dependencies stay at warn level
        EnvFilter::new(format!(
            "warn,springbrook_upload={level}",
            level = level.as_str().to_lowercase()
        ))
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Stage;

    #[test]
    fn verbosity_levels() {
        assert_eq!(LogConfig::from_verbosity(0).level, Level::WARN);
        assert_eq!(LogConfig::from_verbosity(1).level, Level::INFO);
        assert_eq!(LogConfig::from_verbosity(2).level, Level::DEBUG);
        assert_eq!(LogConfig::from_verbosity(9).level, Level::TRACE);
        assert_eq!(
            LogConfig::from_verbosity(0).error_log,
            Some(PathBuf::from(DEFAULT_ERROR_LOG))
        );
    }

    #[test]
    fn chain_includes_sources() {
        let error = PipelineError::FileNotAccessible {
            path: PathBuf::from("export.csv"),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        assert_eq!(
            error_chain(&error),
            "cannot open 'export.csv': no such file"
        );
    }

    #[test]
    fn error_log_appends_errors_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("log.txt");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "earlier run\n").unwrap();

        let subscriber = tracing_subscriber::registry().with(error_log_layer(&path).unwrap());
        tracing::subscriber::with_default(subscriber, || {
            let error = PipelineError::FileNotAccessible {
                path: PathBuf::from("export.csv"),
                source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
            };
            report_failure(&error);
            tracing::info!("not an error");
            report_failure(&PipelineError::MissingColumn {
                column: "Location".to_owned(),
                stage: Stage::Format,
            });
        });

        let log = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = log.lines().collect();
        assert_eq!(lines.len(), 3, "{log}");
        assert_eq!(lines[0], "earlier run");
        for line in &lines[1..] {
            assert!(line.contains("ERROR"), "{line}");
            assert!(line.contains("pipeline run failed"), "{line}");
            assert!(!line.contains('\x1b'), "{line}");
        }
        assert!(
            lines[1].contains("trace=cannot open 'export.csv': no such file"),
            "{}",
            lines[1]
        );
        assert!(
            lines[2].contains("trace=missing column 'Location' during formatting"),
            "{}",
            lines[2]
        );
    }

    #[test]
    fn error_log_directory_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("logs").join("log.txt");
        let _layer: ErrorLogLayer<tracing_subscriber::Registry> = error_log_layer(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn chain_without_source() {
        let error = PipelineError::MissingColumn {
            column: "Location".to_owned(),
            stage: Stage::Format,
        };
        assert_eq!(
            error_chain(&error),
            "missing column 'Location' during formatting"
        );
    }
}
