// src/submit/submitter.rs

//! Dependency-aware submission of jobs.

use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::job::{JobKey, JobSet, JobSpec};
use crate::render::{ScriptPrinter, printer_for};
use crate::submit::identifier::extract_job_id;
use crate::transport::SubmissionTransport;
use crate::types::Dialect;

/// Renders jobs with one printer and hands them to one transport.
///
/// Submission is sequential: a job's dependency must have its identifier
/// before the job itself can be rendered, so a chain is submitted one job
/// at a time, deepest dependency first.
pub struct Submitter<T: SubmissionTransport> {
    printer: Box<dyn ScriptPrinter>,
    transport: T,
    program: String,
}

impl<T: SubmissionTransport> Submitter<T> {
    /// Submitter for `dialect` using its default submit program.
    pub fn new(dialect: Dialect, transport: T) -> Self {
        Self::with_printer(printer_for(dialect), transport)
    }

    pub fn with_printer(printer: Box<dyn ScriptPrinter>, transport: T) -> Self {
        let program = printer.default_program().to_string();
        Self {
            printer,
            transport,
            program,
        }
    }

    /// Use a different submit program (e.g. a wrapper or an absolute path).
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn printer(&self) -> &dyn ScriptPrinter {
        self.printer.as_ref()
    }

    /// Submit `key`, first submitting every unsubmitted job it depends on.
    ///
    /// An already-submitted `key` is submitted again and gets a new id.
    /// If any job in the chain fails, jobs submitted before it keep their
    /// ids and the failing job is left untouched.
    pub async fn submit<'j>(&mut self, jobs: &'j mut JobSet, key: JobKey) -> Result<&'j JobSpec> {
        let order = jobs.submission_order(key)?;
        if order.len() > 1 {
            debug!(
                %key,
                chain = ?order,
                "submitting unsubmitted dependencies first"
            );
        }

        for next in order {
            self.submit_one(jobs, next).await?;
        }

        jobs.job(key)
    }

    async fn submit_one(&mut self, jobs: &mut JobSet, key: JobKey) -> Result<()> {
        let dependency = jobs.resolve_dependency(key)?;
        let job = jobs.job(key)?;
        let label = job.display_name("unnamed").to_string();

        if job.is_submitted() {
            warn!(job = %label, %key, "job already submitted; submitting again");
        }

        let script = self.printer.render(job, dependency.as_ref())?;
        let args = self.printer.submission_args(dependency.as_ref())?;
        let text = script.to_string();

        debug!(job = %label, %key, program = %self.program, ?args, "dispatching job script");
        let output = self.transport.execute(&self.program, &args, &text).await?;
        let job_id = extract_job_id(&output)?;

        info!(
            job = %label,
            %key,
            job_id = %job_id,
            dialect = %self.printer.dialect(),
            "job submitted"
        );
        jobs.job_mut(key)?.mark_submitted(job_id);
        Ok(())
    }
}
