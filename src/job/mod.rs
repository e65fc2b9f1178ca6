// src/job/mod.rs

//! Job model.
//!
//! - [`commands`] holds command containers and the environment-modules helper.
//! - [`duration`] parses and formats walltime / cpu-time values.
//! - [`parallelism`] describes the node/processor shape of a job.
//! - [`spec`] is the job itself: options, commands, dependency, identifier.
//! - [`set`] owns jobs and links them into dependency chains.

pub mod commands;
pub mod duration;
pub mod parallelism;
pub mod set;
pub mod spec;

pub use commands::{CommandContainer, ModuleSet, Program};
pub use duration::{IntoJobDuration, JobDuration};
pub use parallelism::Parallelism;
pub use set::{JobKey, JobSet};
pub use spec::{
    Dependency, DependencyTarget, JobOption, JobOptions, JobSpec, ResolvedDependency,
};
