//! Tracing setup
//!
//! Logs go to stderr or to the configured file, never to stdout, so the
//! dashboard output is not interleaved with log lines.

use std::fs::OpenOptions;
use std::sync::Arc;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    pub fn parse(s: &str) -> Result<Self, LoggingError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(LoggingError::InvalidFormat(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Unknown log format: {0} (expected pretty or json)")]
    InvalidFormat(String),

    #[error("Failed to open log file {path}: {error}")]
    Io { path: String, error: String },

    #[error("Failed to install subscriber: {0}")]
    Init(String),
}

/// `RUST_LOG` wins; otherwise `gymwatch=<level>`
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("gymwatch={}", level)))
}

/// Install the global subscriber
pub fn init(config: &LoggingConfig) -> Result<(), LoggingError> {
    let format = LogFormat::parse(&config.format)?;

    let writer = match &config.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| LoggingError::Io {
                    path: path.clone(),
                    error: e.to_string(),
                })?;
            BoxMakeWriter::new(Arc::new(file))
        }
        None => BoxMakeWriter::new(std::io::stderr),
    };

    let registry = tracing_subscriber::registry().with(env_filter(&config.level));

    let result = match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
            .try_init(),
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(config.file.is_none())
                    .with_writer(writer),
            )
            .try_init(),
    };

    result.map_err(|e| LoggingError::Init(e.to_string()))
}
