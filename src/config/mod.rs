// src/config/mod.rs

//! Job files.
//!
//! - [`model`] is the TOML-backed data model.
//! - [`loader`] reads a job file from disk.
//! - [`validate`] checks references and dependency cycles.
//! - [`plan`] turns a validated file into a [`JobSet`](crate::job::JobSet).

pub mod loader;
pub mod model;
pub mod plan;
pub mod validate;

pub use loader::{default_job_file_path, load_and_validate, load_from_path, load_from_str};
pub use model::{DefaultSection, JobConfig, JobFile, RawJobFile, SubmitSection};
pub use plan::JobPlan;
