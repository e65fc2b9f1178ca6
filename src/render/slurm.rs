// src/render/slurm.rs

//! Slurm dialect.

use tracing::debug;

use crate::errors::{BatchsubError, Result};
use crate::job::{JobSpec, Parallelism, ResolvedDependency};
use crate::render::{RenderedScript, ScriptHeader, ScriptPrinter, render_body, shebang};
use crate::types::{DependencyKind, Dialect, MailType};

const PREFIX: &str = "#SBATCH";

/// Renders `#SBATCH` directives, including the `--dependency` directive.
#[derive(Debug, Clone, Default)]
pub struct SlurmPrinter {
    header: Option<ScriptHeader>,
}

impl SlurmPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fixed header instead of the current user/host/time.
    pub fn with_header(header: ScriptHeader) -> Self {
        Self {
            header: Some(header),
        }
    }

    fn dependency_directive(dependency: &ResolvedDependency) -> String {
        let kind = match dependency.kind {
            DependencyKind::After => "after",
            DependencyKind::AfterAny => "afterany",
            DependencyKind::AfterOk => "afterok",
            DependencyKind::AfterNotOk => "afternotok",
            DependencyKind::AfterCorr => "aftercorr",
            DependencyKind::Singleton => return "--dependency=singleton".to_string(),
        };
        format!("--dependency={kind}:{}", dependency.job_id)
    }

    fn mail_type(mail_type: MailType) -> &'static str {
        match mail_type {
            MailType::All => "ALL",
            MailType::Begin => "BEGIN",
            MailType::End => "END",
            MailType::Fail => "FAIL",
            MailType::Requeue => "REQUEUE",
        }
    }
}

impl ScriptPrinter for SlurmPrinter {
    fn dialect(&self) -> Dialect {
        Dialect::Slurm
    }

    fn default_program(&self) -> &'static str {
        "sbatch"
    }

    fn render(
        &self,
        job: &JobSpec,
        dependency: Option<&ResolvedDependency>,
    ) -> Result<RenderedScript> {
        let options = job.options();
        let mut lines: Vec<String> = Vec::new();

        match options.parallelism {
            Some(Parallelism::Serial) => {
                lines.push("--nodes=1".to_string());
                lines.push("--ntasks=1".to_string());
            }
            Some(Parallelism::OpenMp { processors }) => {
                lines.push("--nodes=1".to_string());
                lines.push("--ntasks=1".to_string());
                lines.push(format!("--cpus-per-task={processors}"));
            }
            Some(Parallelism::Mpi { nodes }) => {
                lines.push(format!("--nodes={nodes}"));
                lines.push("--ntasks-per-node=1".to_string());
            }
            Some(Parallelism::Hybrid {
                nodes,
                processors_per_node,
            }) => {
                lines.push(format!("--nodes={nodes}"));
                lines.push("--ntasks-per-node=1".to_string());
                lines.push(format!("--cpus-per-task={processors_per_node}"));
            }
            None => {}
        }

        if let Some(name) = &options.name {
            lines.push(format!("--job-name={name}"));
        }
        if let Some(account) = &options.account {
            lines.push(format!("--account={account}"));
        }
        if let Some(queue) = &options.queue {
            lines.push(format!("--partition={queue}"));
        }
        if let Some(walltime) = options.walltime {
            lines.push(format!("--time={walltime}"));
        }
        if let Some(cpu_time) = options.cpu_time {
            debug!(%cpu_time, "slurm has no cpu-time directive; skipping");
        }
        if let Some(mb) = options.memory_per_cpu {
            lines.push(format!("--mem-per-cpu={mb}"));
        }
        if let Some(mb) = options.memory {
            lines.push(format!("--mem={mb}"));
        }
        if let Some(size) = options.job_array_size {
            lines.push(format!("--array=0-{}", size - 1));
        }
        if let Some(dir) = &options.working_directory {
            lines.push(format!("--chdir={dir}"));
        }
        if let Some(path) = &options.error_path {
            lines.push(format!("--error={path}"));
        }
        if let Some(path) = &options.output_path {
            lines.push(format!("--output={path}"));
        }
        if let Some(user) = &options.mail_user {
            lines.push(format!("--mail-user={user}"));
        }
        if !options.mail_types.is_empty() {
            let types: Vec<&str> = options
                .mail_types
                .iter()
                .map(|t| Self::mail_type(*t))
                .collect();
            lines.push(format!("--mail-type={}", types.join(",")));
        }

        match (job.dependency(), dependency) {
            (Some(_), Some(resolved)) => lines.push(Self::dependency_directive(resolved)),
            (Some(_), None) => {
                return Err(BatchsubError::UnresolvedDependency(
                    "Slurm job has a dependency without an identifier".to_string(),
                ));
            }
            (None, _) => {}
        }

        lines.extend(options.custom_directives.iter().cloned());

        Ok(RenderedScript {
            dialect: Dialect::Slurm,
            shebang: shebang(job),
            header: self.header.clone().unwrap_or_else(ScriptHeader::current),
            directives: lines
                .into_iter()
                .map(|line| format!("{PREFIX} {line}"))
                .collect(),
            body: render_body(job),
        })
    }

    fn submission_args(&self, _dependency: Option<&ResolvedDependency>) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}
