// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::types::{DependencyKind, Dialect, MailType, ParallelismMode};

/// Job file exactly as deserialized from TOML, before validation.
///
/// ```toml
/// [submit]
/// scheduler = "pbs"
///
/// [default]
/// account = "ABC_GROUP"
/// walltime = "24h"
///
/// [job.prepare]
/// parallelism = "openmp"
/// params = [4]
/// commands = ["cd /work", "prepare"]
///
/// [job.solve]
/// after = "prepare"
/// commands = ["solve"]
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RawJobFile {
    #[serde(default)]
    pub submit: SubmitSection,

    #[serde(default)]
    pub default: DefaultSection,

    /// Jobs keyed by their name in the file.
    #[serde(default)]
    pub job: BTreeMap<String, JobConfig>,
}

/// Validated job file. Only obtainable through `TryFrom<RawJobFile>`.
#[derive(Debug, Clone)]
pub struct JobFile {
    pub submit: SubmitSection,
    pub default: DefaultSection,
    pub job: BTreeMap<String, JobConfig>,
}

impl JobFile {
    pub(crate) fn new_unchecked(
        submit: SubmitSection,
        default: DefaultSection,
        job: BTreeMap<String, JobConfig>,
    ) -> Self {
        Self {
            submit,
            default,
            job,
        }
    }
}

/// `[submit]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitSection {
    /// `"pbs"` (default) or `"slurm"`.
    #[serde(default)]
    pub scheduler: Dialect,

    /// Submit program to run instead of `qsub` / `sbatch`.
    #[serde(default)]
    pub program: Option<String>,
}

/// `[default]` section: values used by every job that does not set its own.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DefaultSection {
    #[serde(default)]
    pub account: Option<String>,
    #[serde(default)]
    pub queue: Option<String>,
    #[serde(default)]
    pub walltime: Option<String>,
    #[serde(default)]
    pub shell: Option<String>,
    #[serde(default)]
    pub working_directory: Option<String>,
    #[serde(default)]
    pub memory_per_cpu: Option<u64>,
    #[serde(default)]
    pub mail_user: Option<String>,
    /// Modules loaded before every job's commands.
    #[serde(default)]
    pub modules: Vec<String>,
    #[serde(default)]
    pub purge_modules: bool,
}

/// `[job.<name>]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobConfig {
    /// Scheduler job name; the table key is used when absent.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub account: Option<String>,
    #[serde(default)]
    pub queue: Option<String>,
    /// `HH:MM:SS` or `<integer><d|h|m>`.
    #[serde(default)]
    pub walltime: Option<String>,
    #[serde(default)]
    pub cpu_time: Option<String>,
    /// Megabytes per node.
    #[serde(default)]
    pub memory: Option<u64>,
    /// Megabytes per cpu.
    #[serde(default)]
    pub memory_per_cpu: Option<u64>,
    #[serde(default)]
    pub working_directory: Option<String>,
    #[serde(default)]
    pub error_path: Option<String>,
    #[serde(default)]
    pub output_path: Option<String>,
    #[serde(default)]
    pub shell: Option<String>,
    #[serde(default)]
    pub job_array_size: Option<u32>,

    #[serde(default)]
    pub parallelism: Option<ParallelismMode>,
    /// Parameters of `parallelism`: `[processors]`, `[nodes]` or
    /// `[nodes, processors_per_node]`.
    #[serde(default)]
    pub params: Vec<u32>,

    #[serde(default)]
    pub mail_user: Option<String>,
    #[serde(default)]
    pub mail_types: Vec<MailType>,

    /// Extra directive text, rendered verbatim after the dialect prefix.
    #[serde(default)]
    pub directives: Vec<String>,

    /// Modules for this job; replaces `default.modules` when non-empty.
    #[serde(default)]
    pub modules: Vec<String>,

    #[serde(default)]
    pub commands: Vec<String>,

    /// Another job in this file that must be submitted first.
    #[serde(default)]
    pub after: Option<String>,
    /// Identifier of a job submitted outside this file.
    #[serde(default)]
    pub after_id: Option<String>,
    /// Defaults to `after_ok`.
    #[serde(default)]
    pub dependency: Option<DependencyKind>,
}
