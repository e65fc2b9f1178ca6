// src/config/plan.rs

//! Turn a validated [`JobFile`] into jobs ready for submission.

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::model::{DefaultSection, JobConfig, JobFile};
use crate::errors::{BatchsubError, Result};
use crate::job::{CommandContainer, JobKey, JobSet, JobSpec, ModuleSet};

/// Jobs built from a job file, with their handles keyed by file name.
#[derive(Debug, Clone)]
pub struct JobPlan {
    pub jobs: JobSet,
    pub keys: BTreeMap<String, JobKey>,
}

impl JobPlan {
    pub fn key(&self, name: &str) -> Result<JobKey> {
        self.keys
            .get(name)
            .copied()
            .ok_or_else(|| BatchsubError::JobNotFound(name.to_string()))
    }
}

impl JobFile {
    /// Build every job, applying `[default]` values and linking `after`
    /// dependencies.
    pub fn build_plan(&self) -> Result<JobPlan> {
        let mut jobs = JobSet::new();
        let mut keys = BTreeMap::new();

        for (name, cfg) in self.job.iter() {
            let job = build_job(name, cfg, &self.default)?;
            keys.insert(name.clone(), jobs.add(job));
        }

        for (name, cfg) in self.job.iter() {
            let Some(after) = &cfg.after else {
                continue;
            };
            let dependent = keys[name];
            let target = *keys.get(after).ok_or_else(|| {
                BatchsubError::InvalidDependency(format!(
                    "job '{name}' depends on unknown job '{after}'"
                ))
            })?;
            jobs.depends_on(dependent, target, cfg.dependency.unwrap_or_default())?;
        }

        debug!(jobs = jobs.len(), "built job plan from job file");
        Ok(JobPlan { jobs, keys })
    }
}

fn build_job(name: &str, cfg: &JobConfig, defaults: &DefaultSection) -> Result<JobSpec> {
    let mut job = JobSpec::new();

    job.set_name(cfg.name.as_deref().unwrap_or(name));

    if let Some(account) = cfg.account.as_ref().or(defaults.account.as_ref()) {
        job.set_account(account.clone());
    }
    if let Some(queue) = cfg.queue.as_ref().or(defaults.queue.as_ref()) {
        job.set_queue(queue.clone());
    }
    if let Some(walltime) = cfg.walltime.as_ref().or(defaults.walltime.as_ref()) {
        job.set_walltime(walltime)?;
    }
    if let Some(cpu_time) = &cfg.cpu_time {
        job.set_cpu_time(cpu_time)?;
    }
    if let Some(mb) = cfg.memory {
        job.set_memory(mb);
    }
    if let Some(mb) = cfg.memory_per_cpu.or(defaults.memory_per_cpu) {
        job.set_memory_per_cpu(mb);
    }
    if let Some(dir) = cfg
        .working_directory
        .as_ref()
        .or(defaults.working_directory.as_ref())
    {
        job.set_working_directory(dir.clone());
    }
    if let Some(path) = &cfg.error_path {
        job.set_error_path(path.clone());
    }
    if let Some(path) = &cfg.output_path {
        job.set_output_path(path.clone());
    }
    if let Some(shell) = cfg.shell.as_ref().or(defaults.shell.as_ref()) {
        job.set_shell(Some(shell.clone()));
    }
    if let Some(size) = cfg.job_array_size {
        job.set_job_array_size(size);
    }
    if let Some(mode) = cfg.parallelism {
        job.set_parallelism(mode, &cfg.params)?;
    } else if !cfg.params.is_empty() {
        return Err(BatchsubError::InvalidParallelism(format!(
            "job '{name}' sets `params` without `parallelism`"
        )));
    }
    match cfg.mail_user.as_ref().or(defaults.mail_user.as_ref()) {
        Some(user) => {
            job.set_mail(user.clone(), &cfg.mail_types);
        }
        None => {
            job.set_mail_types(&cfg.mail_types);
        }
    }
    for directive in &cfg.directives {
        job.add_custom_directive(directive.clone());
    }
    if let Some(id) = &cfg.after_id {
        job.depends_on_external(id.clone(), cfg.dependency.unwrap_or_default())?;
    }

    let modules = if cfg.modules.is_empty() {
        &defaults.modules
    } else {
        &cfg.modules
    };
    let mut module_set = ModuleSet::new();
    if defaults.purge_modules {
        module_set.purge();
    }
    module_set.load_all(modules.iter().cloned());
    if !module_set.is_empty() {
        job.add_command_container(module_set.to_container());
    }

    if !cfg.commands.is_empty() {
        let mut commands = CommandContainer::shell();
        for line in &cfg.commands {
            commands.append(line.clone());
        }
        job.add_command_container(commands);
    }

    Ok(job)
}
