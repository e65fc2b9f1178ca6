// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::default_job_file_path;
use crate::types::Dialect;

/// Command-line arguments for `batchsub`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "batchsub",
    version,
    about = "Render batch scripts from a job file and submit them to PBS or Slurm.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the job file (TOML).
    #[arg(long, value_name = "PATH", default_value_os_t = default_job_file_path())]
    pub config: PathBuf,

    /// Scheduler dialect; overrides `[submit].scheduler` in the job file.
    #[arg(long, value_enum, value_name = "SCHEDULER")]
    pub scheduler: Option<SchedulerArg>,

    /// Submit over SSH to this destination (e.g. `user@host` or
    /// `ssh://user@host:2222`) instead of running the submit program locally.
    #[arg(long, value_name = "DEST")]
    pub remote: Option<String>,

    /// Submit only this job (and the jobs it depends on).
    #[arg(long, value_name = "NAME")]
    pub job: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `BATCHSUB_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print the rendered scripts without submitting anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Scheduler as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum SchedulerArg {
    Pbs,
    Slurm,
}

impl From<SchedulerArg> for Dialect {
    fn from(arg: SchedulerArg) -> Self {
        match arg {
            SchedulerArg::Pbs => Dialect::Pbs,
            SchedulerArg::Slurm => Dialect::Slurm,
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
