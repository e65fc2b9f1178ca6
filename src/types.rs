// src/types.rs

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Batch scheduler whose directive syntax a script is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// PBS / Torque (`#PBS`, submitted with `qsub`).
    Pbs,
    /// Slurm (`#SBATCH`, submitted with `sbatch`).
    Slurm,
}

impl Default for Dialect {
    fn default() -> Self {
        Dialect::Pbs
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Pbs => write!(f, "PBS"),
            Dialect::Slurm => write!(f, "Slurm"),
        }
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pbs" | "torque" => Ok(Dialect::Pbs),
            "slurm" => Ok(Dialect::Slurm),
            other => Err(format!(
                "invalid scheduler: {other} (expected \"pbs\" or \"slurm\")"
            )),
        }
    }
}

/// Condition under which a dependent job is released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyKind {
    /// Start after the dependency has begun execution.
    After,
    /// Start after the dependency terminated, whatever the outcome.
    AfterAny,
    /// Start after the dependency completed with exit code zero.
    AfterOk,
    /// Start after the dependency terminated in a failed state.
    AfterNotOk,
    /// Array task N starts after task N of the dependency succeeded.
    AfterCorr,
    /// Start after every earlier job with the same name and user terminated.
    Singleton,
}

impl Default for DependencyKind {
    fn default() -> Self {
        DependencyKind::AfterOk
    }
}

impl FromStr for DependencyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "after" => Ok(DependencyKind::After),
            "after_any" | "afterany" => Ok(DependencyKind::AfterAny),
            "after_ok" | "afterok" => Ok(DependencyKind::AfterOk),
            "after_not_ok" | "afternotok" => Ok(DependencyKind::AfterNotOk),
            "after_corr" | "aftercorr" => Ok(DependencyKind::AfterCorr),
            "singleton" => Ok(DependencyKind::Singleton),
            other => Err(format!("invalid dependency kind: {other}")),
        }
    }
}

/// Events the scheduler should send mail about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MailType {
    All,
    Begin,
    End,
    Fail,
    Requeue,
}

/// Parallelism mode name, without its parameters.
///
/// Used when the mode arrives as data (job files, CLI flags) and its
/// parameters have to be validated separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParallelismMode {
    Serial,
    OpenMp,
    Mpi,
    Hybrid,
}

impl ParallelismMode {
    /// Number of parameters the mode expects.
    pub fn arity(self) -> usize {
        match self {
            ParallelismMode::Serial => 0,
            ParallelismMode::OpenMp | ParallelismMode::Mpi => 1,
            ParallelismMode::Hybrid => 2,
        }
    }
}

impl fmt::Display for ParallelismMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParallelismMode::Serial => "serial",
            ParallelismMode::OpenMp => "openmp",
            ParallelismMode::Mpi => "mpi",
            ParallelismMode::Hybrid => "hybrid",
        };
        f.write_str(s)
    }
}

impl FromStr for ParallelismMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "serial" => Ok(ParallelismMode::Serial),
            "openmp" | "open_mp" => Ok(ParallelismMode::OpenMp),
            "mpi" => Ok(ParallelismMode::Mpi),
            "hybrid" => Ok(ParallelismMode::Hybrid),
            other => Err(format!(
                "invalid parallelism mode: {other} (expected serial, openmp, mpi or hybrid)"
            )),
        }
    }
}
