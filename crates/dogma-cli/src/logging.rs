//! Logging for the token CLI
//!
//! Console output goes to stderr so stdout only carries the created token.
//! File output is off unless `DOGMA_LOG_FILE` is set.
//!
//! | Variable               | Meaning                          | Default          |
//! |------------------------|----------------------------------|------------------|
//! | `DOGMA_LOG_LEVEL`      | Console level                    | `warn`           |
//! | `DOGMA_LOG_CONSOLE`    | Enable console output            | `true`           |
//! | `DOGMA_LOG_FILE`       | Enable file output               | `false`          |
//! | `DOGMA_LOG_FILE_LEVEL` | File level                       | console level    |
//! | `DOGMA_LOG_DIR`        | Directory of `dogma-token.log`   | `~/dogma/logs`   |
//! | `DOGMA_LOG_ROTATION`   | `daily`, `hourly` or `never`     | `daily`          |
//!
//! `RUST_LOG`, when set, overrides both levels.

use std::path::PathBuf;
use std::str::FromStr;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

const LOG_FILE_NAME: &str = "dogma-token.log";

/// Log rotation policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogRotation {
    Daily,
    Hourly,
    Never,
}

impl From<LogRotation> for Rotation {
    fn from(rotation: LogRotation) -> Self {
        match rotation {
            LogRotation::Daily => Rotation::DAILY,
            LogRotation::Hourly => Rotation::HOURLY,
            LogRotation::Never => Rotation::NEVER,
        }
    }
}

impl FromStr for LogRotation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(LogRotation::Daily),
            "hourly" => Ok(LogRotation::Hourly),
            "never" => Ok(LogRotation::Never),
            other => Err(format!("unknown log rotation: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub log_dir: PathBuf,
    pub console_output: bool,
    pub console_level: Level,
    pub file_logging: bool,
    pub file_level: Level,
    pub rotation: LogRotation,
}

fn default_log_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(format!("{}/dogma/logs", home))
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            console_output: true,
            console_level: Level::WARN,
            file_logging: false,
            file_level: Level::WARN,
            rotation: LogRotation::Daily,
        }
    }
}

impl LoggingConfig {
    /// Create from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let log_dir = lookup("DOGMA_LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_log_dir);

        let console_output = lookup("DOGMA_LOG_CONSOLE")
            .map(|v| v.to_lowercase() != "false" && v != "0")
            .unwrap_or(true);

        let file_logging = lookup("DOGMA_LOG_FILE")
            .map(|v| v.to_lowercase() == "true" || v == "1")
            .unwrap_or(false);

        let console_level = lookup("DOGMA_LOG_LEVEL")
            .and_then(|v| v.parse().ok())
            .unwrap_or(Level::WARN);

        let file_level = lookup("DOGMA_LOG_FILE_LEVEL")
            .and_then(|v| v.parse().ok())
            .unwrap_or(console_level);

        let rotation = lookup("DOGMA_LOG_ROTATION")
            .and_then(|v| v.parse().ok())
            .unwrap_or(LogRotation::Daily);

        Self {
            log_dir,
            console_output,
            console_level,
            file_logging,
            file_level,
            rotation,
        }
    }
}

/// Keeps the file writer alive; buffered output is flushed on drop.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Install the global subscriber
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<LoggingGuard> {
    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();
    let mut file_guard = None;

    if config.console_output {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.console_level.to_string()));
        let console_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_filter(filter);
        layers.push(Box::new(console_layer));
    }

    if config.file_logging {
        std::fs::create_dir_all(&config.log_dir)?;
        let appender =
            RollingFileAppender::new(config.rotation.into(), &config.log_dir, LOG_FILE_NAME);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        file_guard = Some(guard);

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.file_level.to_string()));
        let file_layer = fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .with_filter(filter);
        layers.push(Box::new(file_layer));
    }

    Registry::default()
        .with(layers)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    if config.file_logging {
        tracing::debug!(
            log_dir = %config.log_dir.display(),
            "File logging initialized: {}",
            LOG_FILE_NAME
        );
    }

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_logging_config_default() {
        let config = LoggingConfig::default();
        assert!(config.console_output);
        assert!(!config.file_logging);
        assert_eq!(config.console_level, Level::WARN);
    }

    #[test]
    fn test_logging_config_from_vars() {
        let config = LoggingConfig::from_lookup(lookup(&[
            ("DOGMA_LOG_DIR", "/tmp/dogma-logs"),
            ("DOGMA_LOG_FILE", "true"),
            ("DOGMA_LOG_CONSOLE", "0"),
            ("DOGMA_LOG_LEVEL", "debug"),
        ]));
        assert_eq!(config.log_dir, PathBuf::from("/tmp/dogma-logs"));
        assert!(config.file_logging);
        assert!(!config.console_output);
        assert_eq!(config.console_level, Level::DEBUG);
        assert_eq!(config.file_level, Level::DEBUG);
    }

    #[test]
    fn test_logging_config_bad_level_falls_back() {
        let config = LoggingConfig::from_lookup(lookup(&[("DOGMA_LOG_LEVEL", "loud")]));
        assert_eq!(config.console_level, Level::WARN);
    }

    #[test]
    fn test_logging_config_rotation() {
        let config = LoggingConfig::from_lookup(lookup(&[]));
        assert_eq!(config.rotation, LogRotation::Daily);

        let config = LoggingConfig::from_lookup(lookup(&[("DOGMA_LOG_ROTATION", "Hourly")]));
        assert_eq!(config.rotation, LogRotation::Hourly);

        let config = LoggingConfig::from_lookup(lookup(&[("DOGMA_LOG_ROTATION", "never")]));
        assert_eq!(config.rotation, LogRotation::Never);

        let config = LoggingConfig::from_lookup(lookup(&[("DOGMA_LOG_ROTATION", "weekly")]));
        assert_eq!(config.rotation, LogRotation::Daily);
        assert!("weekly".parse::<LogRotation>().is_err());
    }

    #[test]
    fn test_log_rotation_conversion() {
        assert!(matches!(Rotation::from(LogRotation::Daily), Rotation::DAILY));
        assert!(matches!(Rotation::from(LogRotation::Hourly), Rotation::HOURLY));
        assert!(matches!(Rotation::from(LogRotation::Never), Rotation::NEVER));
    }
}
