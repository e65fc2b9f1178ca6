// src/logging.rs

//! `tracing` subscriber for the `batchsub` binary.
//!
//! The filter comes from the first of:
//! 1. `--log-level`,
//! 2. `BATCHSUB_LOG`, which takes full filter directives
//!    (`info`, `batchsub=debug,openssh=warn`, ...),
//! 3. `info`.
//!
//! Logs go to stderr. Stdout carries rendered scripts and the submission
//! listing only.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use crate::cli::LogLevel;

/// Environment variable read when no CLI level is given.
pub const LOG_ENV_VAR: &str = "BATCHSUB_LOG";

const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env_value = std::env::var(LOG_ENV_VAR).ok();
    let filter = build_filter(cli_level, env_value.as_deref());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;

    Ok(())
}

/// Filter for the given CLI level and `BATCHSUB_LOG` value.
///
/// An empty or unparseable environment value falls back to `info`.
pub fn build_filter(cli_level: Option<LogLevel>, env_value: Option<&str>) -> EnvFilter {
    if let Some(level) = cli_level {
        return EnvFilter::new(level.as_str());
    }

    env_value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .and_then(|value| EnvFilter::try_new(value).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}
