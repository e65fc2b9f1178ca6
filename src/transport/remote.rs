// src/transport/remote.rs

//! Submit over an SSH session owned by the caller.

use std::future::Future;
use std::pin::Pin;

use openssh::{ChildStdin, Session, Stdio};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::errors::{BatchsubError, Result};
use crate::transport::{SubmissionTransport, combine_output};

/// Runs the submit program on a remote host.
///
/// The session is borrowed: it is reused for every submission and never
/// closed here.
#[derive(Clone, Copy)]
pub struct RemoteTransport<'s> {
    session: &'s Session,
}

impl<'s> RemoteTransport<'s> {
    pub fn new(session: &'s Session) -> Self {
        Self { session }
    }
}

/// Remote sessions take one command line, not an argv array.
pub fn command_line(program: &str, extra_args: &[String]) -> String {
    std::iter::once(program)
        .chain(extra_args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

impl SubmissionTransport for RemoteTransport<'_> {
    fn execute<'a>(
        &'a mut self,
        program: &'a str,
        extra_args: &'a [String],
        script: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        let session = self.session;
        Box::pin(async move { run_remote(session, program, extra_args, script).await })
    }
}

async fn run_remote(
    session: &Session,
    program: &str,
    extra_args: &[String],
    script: &str,
) -> Result<String> {
    let line = command_line(program, extra_args);
    info!(command = %line, "running remote submit command");

    let mut child = session
        .raw_command(&line)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .await
        .map_err(|e| BatchsubError::transport(program, format!("failed to start remote command: {e}")))?;

    let mut stdin = child
        .stdin()
        .take()
        .ok_or_else(|| BatchsubError::transport(program, "remote stdin was not piped"))?;

    let written = write_script(&mut stdin, script).await;
    drop(stdin);

    let output = child
        .wait_with_output()
        .await
        .map_err(|e| BatchsubError::transport(program, format!("failed to read remote output: {e}")))?;

    let text = combine_output(&output.stdout, &output.stderr);
    debug!(command = %line, status = %output.status, output = %text.trim_end(), "remote submit command finished");

    if !output.status.success() {
        return Err(BatchsubError::transport(
            program,
            format!("remote command exited with {}: {}", output.status, text.trim_end()),
        ));
    }

    written.map_err(|e| BatchsubError::transport(program, format!("failed to write script: {e}")))?;

    Ok(text)
}

async fn write_script(stdin: &mut ChildStdin, script: &str) -> std::io::Result<()> {
    stdin.write_all(script.as_bytes()).await?;
    // EOF for the remote submit program.
    stdin.shutdown().await
}
