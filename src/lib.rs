// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod job;
pub mod logging;
pub mod render;
pub mod submit;
pub mod transport;
pub mod types;

use std::collections::HashMap;

use anyhow::{Context, Result, anyhow};
use openssh::{KnownHosts, Session};
use tracing::{error, info};

use crate::cli::CliArgs;
use crate::config::{JobPlan, load_and_validate};
use crate::job::{DependencyTarget, JobKey, ResolvedDependency};
use crate::render::printer_for;
use crate::submit::Submitter;
use crate::transport::{LocalTransport, RemoteTransport, SubmissionTransport};
use crate::types::Dialect;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - job file loading and validation
/// - printer selection for the scheduler dialect
/// - local or SSH transport
/// - sequential, dependency-ordered submission
pub async fn run(args: CliArgs) -> Result<()> {
    let file = load_and_validate(&args.config)
        .with_context(|| format!("loading job file {:?}", args.config))?;

    let dialect = args
        .scheduler
        .map(Dialect::from)
        .unwrap_or(file.submit.scheduler);
    let mut plan = file.build_plan()?;

    let targets = match &args.job {
        Some(name) => vec![plan.key(name)?],
        None => plan.keys.values().copied().collect(),
    };
    info!(%dialect, jobs = targets.len(), "job file loaded");

    if args.dry_run {
        print_dry_run(&plan, dialect, &targets)?;
        return Ok(());
    }

    let program = file.submit.program.clone();

    match &args.remote {
        Some(destination) => {
            let session = Session::connect_mux(destination, KnownHosts::Strict)
                .await
                .with_context(|| format!("connecting to {destination}"))?;

            let outcome = {
                let submitter = make_submitter(dialect, RemoteTransport::new(&session), program);
                submit_batch(submitter, &mut plan, &targets).await
            };

            session
                .close()
                .await
                .context("closing SSH session")?;
            outcome
        }
        None => {
            let submitter = make_submitter(dialect, LocalTransport::new(), program);
            submit_batch(submitter, &mut plan, &targets).await
        }
    }
}

fn make_submitter<T: SubmissionTransport>(
    dialect: Dialect,
    transport: T,
    program: Option<String>,
) -> Submitter<T> {
    let submitter = Submitter::new(dialect, transport);
    match program {
        Some(program) => submitter.with_program(program),
        None => submitter,
    }
}

/// Submit every target in order. A failed job does not stop the batch and
/// never un-submits jobs that already went through.
async fn submit_batch<T: SubmissionTransport>(
    mut submitter: Submitter<T>,
    plan: &mut JobPlan,
    targets: &[JobKey],
) -> Result<()> {
    let names = file_names(plan);
    let mut failures = Vec::new();

    for &key in targets {
        let already = plan.jobs.job(key)?.is_submitted();
        if already {
            continue;
        }
        if let Err(err) = submitter.submit(&mut plan.jobs, key).await {
            error!(job = %names[&key], error = %err, "submission failed");
            failures.push(names[&key].clone());
        }
    }

    for (key, job) in plan.jobs.iter() {
        if let Ok(id) = job.get_id() {
            println!("{}\t{}\t{}", names[&key], job.display_name("-"), id);
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(anyhow!(
            "{} job(s) failed to submit: {}",
            failures.len(),
            failures.join(", ")
        ))
    }
}

fn file_names(plan: &JobPlan) -> HashMap<JobKey, String> {
    plan.keys
        .iter()
        .map(|(name, key)| (*key, name.clone()))
        .collect()
}

/// Print every target script. Dependencies on jobs of this file are shown
/// as `<name>` since they have no identifier yet.
fn print_dry_run(plan: &JobPlan, dialect: Dialect, targets: &[JobKey]) -> Result<()> {
    let printer = printer_for(dialect);
    let names = file_names(plan);

    println!("batchsub dry-run ({dialect})");

    for &key in targets {
        let job = plan.jobs.job(key)?;
        let dependency = job.dependency().map(|dep| ResolvedDependency {
            kind: dep.kind,
            job_id: match &dep.target {
                DependencyTarget::External(id) => id.clone(),
                DependencyTarget::Job(target) => format!("<{}>", names[target]),
            },
        });

        let script = printer.render(job, dependency.as_ref())?;
        let args = printer.submission_args(dependency.as_ref())?;

        println!();
        println!("Job \"{}\":", names[&key]);
        println!("{}", "=".repeat(58));
        if !args.is_empty() {
            println!("# {} {}", printer.default_program(), args.join(" "));
        }
        println!("{script}");
        println!("{}", "=".repeat(58));
    }

    Ok(())
}
