// src/transport/local.rs

//! Submit by spawning the scheduler's submit program locally.

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

use crate::errors::{BatchsubError, Result};
use crate::transport::{SubmissionTransport, combine_output};

/// Runs `qsub` / `sbatch` (or any program) as a child process.
#[derive(Debug, Clone, Default)]
pub struct LocalTransport;

impl LocalTransport {
    pub fn new() -> Self {
        Self
    }
}

impl SubmissionTransport for LocalTransport {
    fn execute<'a>(
        &'a mut self,
        program: &'a str,
        extra_args: &'a [String],
        script: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        Box::pin(run_local(program, extra_args, script))
    }
}

async fn run_local(program: &str, extra_args: &[String], script: &str) -> Result<String> {
    info!(program, args = ?extra_args, "spawning local submit process");

    let mut child = Command::new(program)
        .args(extra_args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| BatchsubError::transport(program, format!("failed to spawn: {e}")))?;

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| BatchsubError::transport(program, "stdin was not piped"))?;

    // Feed stdin while stdout and stderr are drained.
    let input = script.to_owned();
    let writer = tokio::spawn(async move {
        stdin.write_all(input.as_bytes()).await?;
        stdin.shutdown().await
    });

    let output = child
        .wait_with_output()
        .await
        .map_err(|e| BatchsubError::transport(program, format!("failed to wait: {e}")))?;

    let written = writer.await;

    let text = combine_output(&output.stdout, &output.stderr);
    debug!(program, status = %output.status, output = %text.trim_end(), "local submit process exited");

    // Exit status first: a rejecting program may stop reading its input.
    if !output.status.success() {
        return Err(BatchsubError::transport(
            program,
            format!("exited with {}: {}", output.status, text.trim_end()),
        ));
    }

    written
        .map_err(|e| BatchsubError::transport(program, format!("stdin writer panicked: {e}")))?
        .map_err(|e| BatchsubError::transport(program, format!("failed to write script: {e}")))?;

    Ok(text)
}
