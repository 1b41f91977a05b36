//! Logging bootstrap for wsframe
//!
//! Installs a `tracing` subscriber with an `EnvFilter` and either a JSON
//! layer for production or a pretty layer for development.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable selecting the log format
pub const LOG_FORMAT_ENV: &str = "WSFRAME_LOG_FORMAT";

/// Output format for log lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Structured JSON, one object per line
    #[default]
    Json,
    /// Human-readable multi-line output
    Pretty,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            other => anyhow::bail!("unknown log format '{other}' (expected 'json' or 'pretty')"),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Output format
    pub format: LogFormat,
    /// Filter directive used when `RUST_LOG` is unset
    pub default_level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Json,
            default_level: "info".to_string(),
        }
    }
}

impl LogConfig {
    /// Build a config from `WSFRAME_LOG_FORMAT`, falling back to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(format) = std::env::var(LOG_FORMAT_ENV) {
            config.format = format
                .parse()
                .with_context(|| format!("invalid {LOG_FORMAT_ENV}"))?;
        }
        Ok(config)
    }

    fn env_filter(&self) -> Result<EnvFilter> {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => EnvFilter::try_new(&self.default_level)
                .with_context(|| format!("invalid log level '{}'", self.default_level)),
        }
    }
}

/// Initialize the tracing/logging subsystem
pub fn init_tracing(config: &LogConfig) -> Result<()> {
    let json_layer = (config.format == LogFormat::Json).then(|| {
        fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
    });

    let pretty_layer = (config.format == LogFormat::Pretty).then(|| {
        fmt::layer()
            .pretty()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
    });

    tracing_subscriber::registry()
        .with(config.env_filter()?)
        .with(json_layer)
        .with(pretty_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    info!(format = ?config.format, "Tracing initialized");
    Ok(())
}

/// Install a test-friendly subscriber that writes through the test harness.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
