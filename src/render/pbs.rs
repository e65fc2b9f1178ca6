// src/render/pbs.rs

//! PBS / Torque dialect.

use tracing::debug;

use crate::errors::{BatchsubError, Result};
use crate::job::{JobSpec, Parallelism, ResolvedDependency};
use crate::render::{RenderedScript, ScriptHeader, ScriptPrinter, render_body, shebang};
use crate::types::{DependencyKind, Dialect, MailType};

const PREFIX: &str = "#PBS";

/// Renders `#PBS` directives.
///
/// Dependencies never appear in the script: they become a `-W depend=`
/// argument to `qsub`. When a walltime is set without an explicit cpu time,
/// the cpu time is derived from the walltime and the parallelism mode.
#[derive(Debug, Clone, Default)]
pub struct PbsPrinter {
    header: Option<ScriptHeader>,
}

impl PbsPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fixed header instead of the current user/host/time.
    pub fn with_header(header: ScriptHeader) -> Self {
        Self {
            header: Some(header),
        }
    }

    fn dependency_type(kind: DependencyKind) -> Result<&'static str> {
        match kind {
            DependencyKind::After => Ok("after"),
            DependencyKind::AfterAny => Ok("afterany"),
            DependencyKind::AfterOk => Ok("afterok"),
            DependencyKind::AfterNotOk => Ok("afternotok"),
            DependencyKind::AfterCorr | DependencyKind::Singleton => {
                Err(BatchsubError::InvalidDependency(format!(
                    "{kind:?} dependencies are not supported by PBS"
                )))
            }
        }
    }

    fn mail_events(types: &[MailType]) -> String {
        let mut events = String::new();
        let mut push = |c: char| {
            if !events.contains(c) {
                events.push(c);
            }
        };
        for mail_type in types {
            match mail_type {
                MailType::All => {
                    push('a');
                    push('b');
                    push('e');
                }
                MailType::Fail => push('a'),
                MailType::Begin => push('b'),
                MailType::End => push('e'),
                // No PBS event for requeues.
                MailType::Requeue => {}
            }
        }
        events
    }
}

impl ScriptPrinter for PbsPrinter {
    fn dialect(&self) -> Dialect {
        Dialect::Pbs
    }

    fn default_program(&self) -> &'static str {
        "qsub"
    }

    fn render(
        &self,
        job: &JobSpec,
        dependency: Option<&ResolvedDependency>,
    ) -> Result<RenderedScript> {
        if job.dependency().is_some() && dependency.is_none() {
            return Err(BatchsubError::UnresolvedDependency(
                "PBS job has a dependency without an identifier".to_string(),
            ));
        }

        let options = job.options();
        let mut lines: Vec<String> = Vec::new();

        match options.parallelism {
            Some(Parallelism::Serial) => {
                lines.push("-l nodes=1:ppn=1".to_string());
                lines.push("-l procs=1".to_string());
            }
            Some(Parallelism::OpenMp { processors }) => {
                lines.push(format!("-l nodes=1:ppn={processors}"));
            }
            Some(Parallelism::Mpi { nodes }) => {
                lines.push(format!("-l nodes={nodes}:ppn=1"));
                lines.push(format!("-l procs={nodes}"));
            }
            Some(Parallelism::Hybrid {
                nodes,
                processors_per_node,
            }) => {
                lines.push(format!("-l nodes={nodes}:ppn={processors_per_node}"));
            }
            None => {}
        }

        if let Some(name) = &options.name {
            lines.push(format!("-N {name}"));
        }
        if let Some(account) = &options.account {
            lines.push(format!("-A {account}"));
        }
        if let Some(queue) = &options.queue {
            lines.push(format!("-q {queue}"));
        }
        if let Some(walltime) = options.walltime {
            lines.push(format!("-l walltime={walltime}"));
        }

        let cpu_time = options.cpu_time.or_else(|| {
            let walltime = options.walltime?;
            let multiplier = options
                .parallelism
                .map(|p| p.cpu_time_multiplier())
                .unwrap_or(1);
            let derived = walltime.scaled(multiplier);
            debug!(%walltime, multiplier, cpu_time = %derived, "deriving PBS cpu time");
            Some(derived)
        });
        if let Some(cpu_time) = cpu_time {
            lines.push(format!("-l cput={cpu_time}"));
        }

        if let Some(mb) = options.memory_per_cpu {
            lines.push(format!("-l pmem={mb}mb"));
        }
        if let Some(mb) = options.memory {
            lines.push(format!("-l mem={mb}mb"));
        }
        if let Some(size) = options.job_array_size {
            lines.push(format!("-t 0-{}", size - 1));
        }
        if let Some(dir) = &options.working_directory {
            lines.push(format!("-d {dir}"));
        }
        if let Some(path) = &options.error_path {
            lines.push(format!("-e {path}"));
        }
        if let Some(path) = &options.output_path {
            lines.push(format!("-o {path}"));
        }
        if let Some(user) = &options.mail_user {
            lines.push(format!("-M {user}"));
        }
        let events = Self::mail_events(&options.mail_types);
        if !events.is_empty() {
            lines.push(format!("-m {events}"));
        }
        lines.extend(options.custom_directives.iter().cloned());

        Ok(RenderedScript {
            dialect: Dialect::Pbs,
            shebang: shebang(job),
            header: self.header.clone().unwrap_or_else(ScriptHeader::current),
            directives: lines
                .into_iter()
                .map(|line| format!("{PREFIX} {line}"))
                .collect(),
            body: render_body(job),
        })
    }

    fn submission_args(&self, dependency: Option<&ResolvedDependency>) -> Result<Vec<String>> {
        let Some(dependency) = dependency else {
            return Ok(Vec::new());
        };
        let kind = Self::dependency_type(dependency.kind)?;
        Ok(vec![
            "-W".to_string(),
            format!("depend={kind}:{}", dependency.job_id),
        ])
    }
}
