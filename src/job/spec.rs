// src/job/spec.rs

//! The job specification: typed submission options, command containers,
//! an optional dependency and the identifier assigned by the scheduler.

use crate::errors::{BatchsubError, Result};
use crate::job::commands::CommandContainer;
use crate::job::duration::{IntoJobDuration, JobDuration};
use crate::job::parallelism::Parallelism;
use crate::job::set::JobKey;
use crate::types::{DependencyKind, MailType, ParallelismMode};

/// Longest job name the schedulers accept.
pub const MAX_NAME_LEN: usize = 15;

/// Shell written into the shebang of new jobs.
pub const DEFAULT_SHELL: &str = "/bin/bash";

/// Strip everything that is not an ASCII letter or digit and keep at most
/// [`MAX_NAME_LEN`] characters.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .take(MAX_NAME_LEN)
        .collect()
}

/// Every recognised submission option. Unset fields produce no directive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobOptions {
    /// Already sanitized, see [`sanitize_name`].
    pub name: Option<String>,
    /// Account / accounting group charged for the job.
    pub account: Option<String>,
    pub walltime: Option<JobDuration>,
    pub cpu_time: Option<JobDuration>,
    /// Memory per node, in megabytes.
    pub memory: Option<u64>,
    /// Memory per cpu (per process), in megabytes.
    pub memory_per_cpu: Option<u64>,
    pub working_directory: Option<String>,
    pub error_path: Option<String>,
    pub output_path: Option<String>,
    pub shell: Option<String>,
    pub job_array_size: Option<u32>,
    pub parallelism: Option<Parallelism>,
    pub queue: Option<String>,
    pub mail_user: Option<String>,
    pub mail_types: Vec<MailType>,
    /// Raw directive text, rendered after every other directive.
    pub custom_directives: Vec<String>,
}

/// One option assignment, for callers that carry options around as data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOption {
    Name(String),
    Account(String),
    Walltime(JobDuration),
    CpuTime(JobDuration),
    Memory(u64),
    MemoryPerCpu(u64),
    WorkingDirectory(String),
    ErrorPath(String),
    OutputPath(String),
    Shell(Option<String>),
    JobArraySize(u32),
    Parallelism(Parallelism),
    Queue(String),
    MailUser(String),
    MailTypes(Vec<MailType>),
    CustomDirective(String),
}

/// What a job waits for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyTarget {
    /// Another job in the same [`JobSet`](crate::job::JobSet).
    Job(JobKey),
    /// A job submitted elsewhere, known only by its scheduler identifier.
    External(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub target: DependencyTarget,
    pub kind: DependencyKind,
}

/// A dependency whose identifier is known, ready to be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDependency {
    pub kind: DependencyKind,
    pub job_id: String,
}

/// A batch job.
///
/// The identifier is only ever set together with the submitted state:
/// [`JobSpec::is_submitted`] is `true` exactly when an id is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSpec {
    options: JobOptions,
    command_containers: Vec<CommandContainer>,
    dependency: Option<Dependency>,
    id: Option<String>,
}

impl Default for JobSpec {
    fn default() -> Self {
        Self::new()
    }
}

impl JobSpec {
    /// A job with no options except the default shell.
    pub fn new() -> Self {
        Self {
            options: JobOptions {
                shell: Some(DEFAULT_SHELL.to_string()),
                ..JobOptions::default()
            },
            command_containers: Vec::new(),
            dependency: None,
            id: None,
        }
    }

    pub fn options(&self) -> &JobOptions {
        &self.options
    }

    pub fn command_containers(&self) -> &[CommandContainer] {
        &self.command_containers
    }

    pub fn dependency(&self) -> Option<&Dependency> {
        self.dependency.as_ref()
    }

    pub fn is_submitted(&self) -> bool {
        self.id.is_some()
    }

    /// Scheduler identifier, or [`BatchsubError::NotSubmitted`].
    pub fn get_id(&self) -> Result<&str> {
        self.id.as_deref().ok_or_else(|| {
            BatchsubError::NotSubmitted(
                self.options
                    .name
                    .clone()
                    .unwrap_or_else(|| "<unnamed job>".to_string()),
            )
        })
    }

    /// Record a successful submission.
    pub(crate) fn mark_submitted(&mut self, id: String) {
        self.id = Some(id);
    }

    /// Store one option. Later assignments to the same option win.
    ///
    /// Durations are already typed; a parallelism value is checked like
    /// [`JobSpec::set_parallelism`] checks its parameters.
    pub fn set_option(&mut self, option: JobOption) -> Result<&mut Self> {
        match option {
            JobOption::Name(name) => return Ok(self.set_name(name)),
            JobOption::Account(v) => self.options.account = Some(v),
            JobOption::Walltime(v) => self.options.walltime = Some(v),
            JobOption::CpuTime(v) => self.options.cpu_time = Some(v),
            JobOption::Memory(v) => self.options.memory = Some(v),
            JobOption::MemoryPerCpu(v) => self.options.memory_per_cpu = Some(v),
            JobOption::WorkingDirectory(v) => self.options.working_directory = Some(v),
            JobOption::ErrorPath(v) => self.options.error_path = Some(v),
            JobOption::OutputPath(v) => self.options.output_path = Some(v),
            JobOption::Shell(v) => self.options.shell = v,
            JobOption::JobArraySize(v) => return Ok(self.set_job_array_size(v)),
            JobOption::Parallelism(v) => self.options.parallelism = Some(v.validated()?),
            JobOption::Queue(v) => self.options.queue = Some(v),
            JobOption::MailUser(v) => self.options.mail_user = Some(v),
            JobOption::MailTypes(v) => self.options.mail_types = v,
            JobOption::CustomDirective(v) => self.options.custom_directives.push(v),
        }
        Ok(self)
    }

    /// Set the job name, sanitized to at most 15 ASCII letters and digits.
    ///
    /// A name with no alphanumeric characters clears the name.
    pub fn set_name(&mut self, name: impl AsRef<str>) -> &mut Self {
        let sanitized = sanitize_name(name.as_ref());
        self.options.name = if sanitized.is_empty() {
            None
        } else {
            Some(sanitized)
        };
        self
    }

    pub fn set_account(&mut self, account: impl Into<String>) -> &mut Self {
        self.options.account = Some(account.into());
        self
    }

    /// Same slot as [`JobSpec::set_account`]; PBS calls it the accounting group.
    pub fn set_accounting_group(&mut self, group: impl Into<String>) -> &mut Self {
        self.set_account(group)
    }

    pub fn set_queue(&mut self, queue: impl Into<String>) -> &mut Self {
        self.options.queue = Some(queue.into());
        self
    }

    pub fn set_walltime(&mut self, walltime: impl IntoJobDuration) -> Result<&mut Self> {
        self.options.walltime = Some(walltime.into_job_duration()?);
        Ok(self)
    }

    pub fn set_cpu_time(&mut self, cpu_time: impl IntoJobDuration) -> Result<&mut Self> {
        self.options.cpu_time = Some(cpu_time.into_job_duration()?);
        Ok(self)
    }

    pub fn set_memory(&mut self, megabytes: u64) -> &mut Self {
        self.options.memory = Some(megabytes);
        self
    }

    pub fn set_memory_per_cpu(&mut self, megabytes: u64) -> &mut Self {
        self.options.memory_per_cpu = Some(megabytes);
        self
    }

    pub fn set_working_directory(&mut self, dir: impl Into<String>) -> &mut Self {
        self.options.working_directory = Some(dir.into());
        self
    }

    pub fn set_error_path(&mut self, path: impl Into<String>) -> &mut Self {
        self.options.error_path = Some(path.into());
        self
    }

    pub fn set_output_path(&mut self, path: impl Into<String>) -> &mut Self {
        self.options.output_path = Some(path.into());
        self
    }

    /// Interpreter for the shebang line; `None` drops the shebang.
    pub fn set_shell(&mut self, shell: Option<String>) -> &mut Self {
        self.options.shell = shell;
        self
    }

    /// Request an array of `size` tasks (indices `0..size`). Zero clears it.
    pub fn set_job_array_size(&mut self, size: u32) -> &mut Self {
        self.options.job_array_size = (size > 0).then_some(size);
        self
    }

    pub fn set_mail(&mut self, user: impl Into<String>, types: &[MailType]) -> &mut Self {
        self.options.mail_user = Some(user.into());
        self.options.mail_types = types.to_vec();
        self
    }

    /// Mail events without a recipient; the scheduler mails the job owner.
    pub fn set_mail_types(&mut self, types: &[MailType]) -> &mut Self {
        self.options.mail_types = types.to_vec();
        self
    }

    pub fn add_custom_directive(&mut self, directive: impl Into<String>) -> &mut Self {
        self.options.custom_directives.push(directive.into());
        self
    }

    /// Select the parallelism mode from a mode name and its parameters.
    ///
    /// Only one mode is active at a time: a second call replaces the first.
    pub fn set_parallelism(&mut self, mode: ParallelismMode, params: &[u32]) -> Result<&mut Self> {
        let parallelism = Parallelism::from_mode(mode, params)?;
        self.options.parallelism = Some(parallelism);
        Ok(self)
    }

    pub fn set_serial(&mut self) -> &mut Self {
        self.options.parallelism = Some(Parallelism::Serial);
        self
    }

    pub fn set_openmp(&mut self, processors: u32) -> Result<&mut Self> {
        self.set_parallelism(ParallelismMode::OpenMp, &[processors])
    }

    pub fn set_mpi(&mut self, nodes: u32) -> Result<&mut Self> {
        self.set_parallelism(ParallelismMode::Mpi, &[nodes])
    }

    pub fn set_hybrid(&mut self, nodes: u32, processors_per_node: u32) -> Result<&mut Self> {
        self.set_parallelism(ParallelismMode::Hybrid, &[nodes, processors_per_node])
    }

    /// Depend on a job that was submitted outside this process.
    pub fn depends_on_external(
        &mut self,
        job_id: impl Into<String>,
        kind: DependencyKind,
    ) -> Result<&mut Self> {
        let job_id = job_id.into();
        if job_id.is_empty() || job_id.chars().any(char::is_whitespace) {
            return Err(BatchsubError::InvalidDependency(format!(
                "{job_id:?} is not a usable job identifier"
            )));
        }
        self.dependency = Some(Dependency {
            target: DependencyTarget::External(job_id),
            kind,
        });
        Ok(self)
    }

    /// Link to another job. Cycle checks live in [`JobSet::depends_on`](crate::job::JobSet::depends_on).
    pub(crate) fn set_dependency(&mut self, dependency: Dependency) {
        self.dependency = Some(dependency);
    }

    pub fn clear_dependency(&mut self) -> &mut Self {
        self.dependency = None;
        self
    }

    pub fn add_command_container(&mut self, container: CommandContainer) -> &mut Self {
        self.command_containers.push(container);
        self
    }

    /// Human-readable label for logs: the name if set, otherwise `fallback`.
    pub fn display_name<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.options.name.as_deref().unwrap_or(fallback)
    }
}
