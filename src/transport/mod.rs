// src/transport/mod.rs

//! How a rendered script reaches the scheduler's submit program.
//!
//! The submitter talks to a [`SubmissionTransport`] rather than spawning
//! processes itself, so tests can swap in a fake that records calls.
//!
//! - [`local`] spawns the submit program on this machine.
//! - [`remote`] runs it over an existing SSH session.
//!
//! Every call opens a fresh process or channel; nothing is retried.

pub mod local;
pub mod remote;

use std::future::Future;
use std::pin::Pin;

use crate::errors::Result;

pub use local::LocalTransport;
pub use remote::RemoteTransport;

/// Execute a submit program with the script on its standard input.
pub trait SubmissionTransport: Send {
    /// Run `program` with `extra_args`, feed it `script`, and return
    /// everything it printed.
    ///
    /// A failure to start, to write the script, to read the output, or a
    /// non-zero exit is reported as
    /// [`BatchsubError::TransportError`](crate::errors::BatchsubError::TransportError).
    fn execute<'a>(
        &'a mut self,
        program: &'a str,
        extra_args: &'a [String],
        script: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>>;
}

/// Join captured stdout and stderr into one result text.
pub(crate) fn combine_output(stdout: &[u8], stderr: &[u8]) -> String {
    let mut text = String::from_utf8_lossy(stdout).into_owned();
    if !stderr.is_empty() {
        if !text.is_empty() && !text.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(&String::from_utf8_lossy(stderr));
    }
    text
}
