// src/submit/mod.rs

//! Submission engine.
//!
//! - [`submitter`] resolves dependency chains, renders and dispatches jobs.
//! - [`identifier`] pulls the job identifier out of the submit program output.

pub mod identifier;
pub mod submitter;

pub use identifier::extract_job_id;
pub use submitter::Submitter;
