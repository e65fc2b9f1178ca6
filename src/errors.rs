// src/errors.rs

//! Crate-wide error type and `Result` alias.
//!
//! Every failure the submission core can produce is a distinct variant so the
//! caller can decide whether to abort a batch or continue with the next job.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BatchsubError {
    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    #[error("Invalid parallelism: {0}")]
    InvalidParallelism(String),

    #[error("Invalid dependency: {0}")]
    InvalidDependency(String),

    #[error("Unresolved dependency: {0}")]
    UnresolvedDependency(String),

    #[error("Transport error running '{program}': {message}")]
    TransportError { program: String, message: String },

    #[error("No job identifier found in scheduler output: {0:?}")]
    IdentifierParse(String),

    #[error("Job has not been submitted yet: {0}")]
    NotSubmitted(String),

    #[error("Job not found: {0}")]
    JobNotFound(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BatchsubError {
    pub(crate) fn transport(program: &str, message: impl Into<String>) -> Self {
        BatchsubError::TransportError {
            program: program.to_string(),
            message: message.into(),
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, BatchsubError>;
