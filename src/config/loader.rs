// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{JobFile, RawJobFile};
use crate::errors::Result;

/// Read and deserialize a job file without semantic validation.
///
/// Use [`load_and_validate`] for anything that will be submitted.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawJobFile> {
    let contents = fs::read_to_string(path.as_ref())?;
    load_from_str(&contents)
}

/// Deserialize a job file from TOML text.
pub fn load_from_str(contents: &str) -> Result<RawJobFile> {
    let file: RawJobFile = toml::from_str(contents)?;
    Ok(file)
}

/// Load a job file and validate it.
///
/// Checks that:
/// - there is at least one job,
/// - every `after` names a job in the file and not the job itself,
/// - no job sets both `after` and `after_id`,
/// - `after` links form no cycle.
///
/// Durations and parallelism parameters are checked when the file is turned
/// into jobs by [`JobFile::build_plan`](crate::config::JobFile::build_plan).
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<JobFile> {
    let raw = load_from_path(&path)?;
    JobFile::try_from(raw)
}

/// `Jobs.toml` in the current working directory.
pub fn default_job_file_path() -> PathBuf {
    PathBuf::from("Jobs.toml")
}
