// src/config/validate.rs

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::config::model::{JobFile, RawJobFile};
use crate::errors::{BatchsubError, Result};

impl TryFrom<RawJobFile> for JobFile {
    type Error = BatchsubError;

    fn try_from(raw: RawJobFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_job_file(&raw)?;
        Ok(JobFile::new_unchecked(raw.submit, raw.default, raw.job))
    }
}

fn validate_raw_job_file(file: &RawJobFile) -> Result<()> {
    ensure_has_jobs(file)?;
    validate_job_dependencies(file)?;
    validate_dependency_graph(file)?;
    Ok(())
}

fn ensure_has_jobs(file: &RawJobFile) -> Result<()> {
    if file.job.is_empty() {
        return Err(BatchsubError::ConfigError(
            "job file must contain at least one [job.<name>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_job_dependencies(file: &RawJobFile) -> Result<()> {
    for (name, job) in file.job.iter() {
        if job.after.is_some() && job.after_id.is_some() {
            return Err(BatchsubError::ConfigError(format!(
                "job '{}' sets both `after` and `after_id`; a job has a single dependency",
                name
            )));
        }
        if job.dependency.is_some() && job.after.is_none() && job.after_id.is_none() {
            return Err(BatchsubError::ConfigError(format!(
                "job '{}' sets `dependency` without `after` or `after_id`",
                name
            )));
        }
        if let Some(dep) = &job.after {
            if !file.job.contains_key(dep) {
                return Err(BatchsubError::ConfigError(format!(
                    "job '{}' has unknown dependency '{}' in `after`",
                    name, dep
                )));
            }
            if dep == name {
                return Err(BatchsubError::InvalidDependency(format!(
                    "job '{}' cannot depend on itself in `after`",
                    name
                )));
            }
        }
    }
    Ok(())
}

fn validate_dependency_graph(file: &RawJobFile) -> Result<()> {
    // Edge direction: dependency -> dependent, so
    //   [job.B]
    //   after = "A"
    // adds A -> B.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for name in file.job.keys() {
        graph.add_node(name.as_str());
    }

    for (name, job) in file.job.iter() {
        if let Some(dep) = &job.after {
            graph.add_edge(dep.as_str(), name.as_str(), ());
        }
    }

    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => Err(BatchsubError::InvalidDependency(format!(
            "dependency cycle detected involving job '{}'",
            cycle.node_id()
        ))),
    }
}
