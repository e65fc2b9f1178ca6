// src/render/mod.rs

//! Script rendering.
//!
//! A [`ScriptPrinter`] turns a [`JobSpec`] into the text handed to the
//! scheduler's submit program. Each dialect owns its directive table:
//!
//! - [`pbs`] renders `#PBS` directives and passes dependencies as `-W depend=`
//!   arguments to `qsub`.
//! - [`slurm`] renders `#SBATCH` directives and embeds dependencies in the
//!   script.

pub mod pbs;
pub mod slurm;

use std::fmt;

use crate::errors::Result;
use crate::job::{JobSpec, ResolvedDependency};
use crate::types::Dialect;

pub use pbs::PbsPrinter;
pub use slurm::SlurmPrinter;

/// Informational comment block at the top of every script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptHeader {
    pub user: String,
    pub host: String,
    pub date: String,
    pub version: String,
}

impl ScriptHeader {
    /// Header describing the current user, host and time.
    pub fn current() -> Self {
        let user = std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_else(|_| "unknown".to_string());
        let host = hostname::get()
            .map(|h| h.to_string_lossy().into_owned())
            .unwrap_or_else(|_| "unknown".to_string());
        let date = chrono::Local::now().format("%a %d %B %Y %X").to_string();

        Self {
            user,
            host,
            date,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    fn lines(&self, dialect: Dialect) -> Vec<String> {
        vec![
            format!("# This {dialect} batch script was generated"),
            format!("# By user: {}", self.user),
            format!("# On host: {}", self.host),
            format!("# At date: {}", self.date),
            format!("# Using: batchsub v{}", self.version),
        ]
    }
}

/// A rendered job script, kept in parts so callers can inspect the
/// directive block and body separately. `Display` yields the wire text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedScript {
    pub dialect: Dialect,
    /// Interpreter named on the `#!` line, if any.
    pub shebang: Option<String>,
    pub header: ScriptHeader,
    /// Complete directive lines, prefix included (e.g. `#PBS -N job`).
    pub directives: Vec<String>,
    /// Command containers, each joined by newlines, separated by blank lines.
    pub body: String,
}

impl fmt::Display for RenderedScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(shell) = &self.shebang {
            writeln!(f, "#!{shell}")?;
        }
        for line in self.header.lines(self.dialect) {
            writeln!(f, "{line}")?;
        }
        writeln!(f)?;

        if !self.directives.is_empty() {
            for directive in &self.directives {
                writeln!(f, "{directive}")?;
            }
            writeln!(f)?;
        }

        f.write_str(&self.body)
    }
}

/// Scheduler dialect: directive syntax plus where dependencies go.
pub trait ScriptPrinter: Send + Sync {
    fn dialect(&self) -> Dialect;

    /// Submit program used when the caller does not name one.
    fn default_program(&self) -> &'static str;

    /// Render `job`. `dependency` must be given whenever the job has one.
    fn render(
        &self,
        job: &JobSpec,
        dependency: Option<&ResolvedDependency>,
    ) -> Result<RenderedScript>;

    /// Extra arguments for the submit program (dependencies, for dialects
    /// that do not embed them in the script).
    fn submission_args(&self, dependency: Option<&ResolvedDependency>) -> Result<Vec<String>>;
}

/// Printer for the given dialect.
pub fn printer_for(dialect: Dialect) -> Box<dyn ScriptPrinter> {
    match dialect {
        Dialect::Pbs => Box::new(PbsPrinter::new()),
        Dialect::Slurm => Box::new(SlurmPrinter::new()),
    }
}

/// Join container bodies in order, one blank line between containers.
pub(crate) fn render_body(job: &JobSpec) -> String {
    job.command_containers()
        .iter()
        .map(|container| container.body())
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub(crate) fn shebang(job: &JobSpec) -> Option<String> {
    job.options()
        .shell
        .as_ref()
        .filter(|shell| !shell.trim().is_empty())
        .cloned()
}
