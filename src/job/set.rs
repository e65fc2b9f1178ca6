// src/job/set.rs

//! Arena of jobs and the dependency links between them.
//!
//! A job refers to its dependency by [`JobKey`], never by ownership, so a
//! chain of jobs is a singly-linked list threaded through the set. Links
//! that would close a cycle are refused when they are made, and the chain
//! walk used at submission time checks again with a visited set.

use std::collections::HashSet;
use std::fmt;

use tracing::debug;

use crate::errors::{BatchsubError, Result};
use crate::job::spec::{Dependency, DependencyTarget, JobSpec, ResolvedDependency};
use crate::types::DependencyKind;

/// Handle to a job inside a [`JobSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobKey(usize);

impl fmt::Display for JobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job#{}", self.0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct JobSet {
    jobs: Vec<JobSpec>,
}

impl JobSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a job and return its handle.
    pub fn add(&mut self, job: JobSpec) -> JobKey {
        self.jobs.push(job);
        JobKey(self.jobs.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn get(&self, key: JobKey) -> Option<&JobSpec> {
        self.jobs.get(key.0)
    }

    pub fn get_mut(&mut self, key: JobKey) -> Option<&mut JobSpec> {
        self.jobs.get_mut(key.0)
    }

    /// Like [`JobSet::get`] but failing with [`BatchsubError::JobNotFound`].
    pub fn job(&self, key: JobKey) -> Result<&JobSpec> {
        self.get(key)
            .ok_or_else(|| BatchsubError::JobNotFound(key.to_string()))
    }

    pub fn job_mut(&mut self, key: JobKey) -> Result<&mut JobSpec> {
        self.jobs
            .get_mut(key.0)
            .ok_or_else(|| BatchsubError::JobNotFound(key.to_string()))
    }

    pub fn keys(&self) -> impl Iterator<Item = JobKey> + '_ {
        (0..self.jobs.len()).map(JobKey)
    }

    pub fn iter(&self) -> impl Iterator<Item = (JobKey, &JobSpec)> {
        self.jobs.iter().enumerate().map(|(i, job)| (JobKey(i), job))
    }

    /// Make `dependent` wait for `target`.
    ///
    /// Replaces any dependency `dependent` already had. Fails with
    /// [`BatchsubError::InvalidDependency`] if either key is unknown, if the
    /// two are the same job, or if `target` already (transitively) waits for
    /// `dependent`.
    pub fn depends_on(
        &mut self,
        dependent: JobKey,
        target: JobKey,
        kind: DependencyKind,
    ) -> Result<&mut JobSpec> {
        if self.get(target).is_none() {
            return Err(BatchsubError::InvalidDependency(format!(
                "dependency target {target} is not a job in this set"
            )));
        }
        if self.get(dependent).is_none() {
            return Err(BatchsubError::InvalidDependency(format!(
                "{dependent} is not a job in this set"
            )));
        }
        if dependent == target {
            return Err(BatchsubError::InvalidDependency(format!(
                "{dependent} cannot depend on itself"
            )));
        }

        // Walk target's chain; reaching `dependent` means the new link closes a loop.
        let mut visited = HashSet::new();
        let mut cursor = Some(target);
        while let Some(key) = cursor {
            if key == dependent {
                return Err(BatchsubError::InvalidDependency(format!(
                    "{dependent} -> {target} would create a dependency cycle"
                )));
            }
            if !visited.insert(key) {
                break;
            }
            cursor = self.linked_job(key);
        }

        debug!(%dependent, %target, ?kind, "linking job dependency");
        let job = self.job_mut(dependent)?;
        job.set_dependency(Dependency {
            target: DependencyTarget::Job(target),
            kind,
        });
        Ok(job)
    }

    /// The job `key` links to, if its dependency is another job in the set.
    fn linked_job(&self, key: JobKey) -> Option<JobKey> {
        match self.get(key)?.dependency() {
            Some(Dependency {
                target: DependencyTarget::Job(next),
                ..
            }) => Some(*next),
            _ => None,
        }
    }

    /// Jobs to submit, in order, so that `key` can be submitted.
    ///
    /// Follows the dependency chain from `key` until a job that is already
    /// submitted, an external identifier or the end of the chain. The
    /// returned list is deepest-first and always ends with `key` itself.
    /// A cycle yields [`BatchsubError::InvalidDependency`].
    pub fn submission_order(&self, key: JobKey) -> Result<Vec<JobKey>> {
        self.job(key)?;

        let mut order = vec![key];
        let mut visited = HashSet::from([key]);
        let mut cursor = self.linked_job(key);

        while let Some(next) = cursor {
            if !visited.insert(next) {
                return Err(BatchsubError::InvalidDependency(format!(
                    "dependency cycle through {next} while resolving {key}"
                )));
            }
            let job = self.job(next)?;
            if job.is_submitted() {
                break;
            }
            order.push(next);
            cursor = self.linked_job(next);
        }

        order.reverse();
        Ok(order)
    }

    /// The dependency of `key` with its identifier filled in.
    ///
    /// `Ok(None)` for jobs without a dependency;
    /// [`BatchsubError::UnresolvedDependency`] when the target job has not
    /// been submitted yet.
    pub fn resolve_dependency(&self, key: JobKey) -> Result<Option<ResolvedDependency>> {
        let job = self.job(key)?;
        let Some(dependency) = job.dependency() else {
            return Ok(None);
        };

        let job_id = match &dependency.target {
            DependencyTarget::External(id) => id.clone(),
            DependencyTarget::Job(target) => {
                let target_job = self.job(*target).map_err(|_| {
                    BatchsubError::InvalidDependency(format!(
                        "{key} depends on {target}, which is not in this set"
                    ))
                })?;
                match target_job.get_id() {
                    Ok(id) => id.to_string(),
                    Err(_) => {
                        return Err(BatchsubError::UnresolvedDependency(format!(
                            "{key} depends on {target}, which has no identifier yet"
                        )));
                    }
                }
            }
        };

        Ok(Some(ResolvedDependency {
            kind: dependency.kind,
            job_id,
        }))
    }
}
