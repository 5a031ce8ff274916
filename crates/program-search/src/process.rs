//! Bounded child-process execution shared by the sandbox and the
//! improvement command

use crate::error::{SearchError, SearchResult};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tokio::task::JoinHandle;

/// Captured result of a finished child
#[derive(Debug)]
pub(crate) struct ProcessOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

/// Run `command` to completion on a private current-thread runtime,
/// killing it once `timeout` elapses.
///
/// Blocks the calling thread, so it must not run on an async worker; async
/// callers go through `spawn_blocking`.
pub(crate) fn run_with_timeout(
    command: &mut Command,
    stdin: Option<String>,
    timeout: Duration,
) -> SearchResult<ProcessOutput> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run(command, stdin, timeout))
}

async fn run(
    command: &mut Command,
    stdin: Option<String>,
    timeout: Duration,
) -> SearchResult<ProcessOutput> {
    command
        .stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = command.spawn()?;

    if let (Some(input), Some(mut pipe)) = (stdin, child.stdin.take()) {
        tokio::spawn(async move {
            let _ = pipe.write_all(input.as_bytes()).await;
        });
    }
    let stdout = child.stdout.take().map(|pipe| tokio::spawn(read_all(pipe)));
    let stderr = child.stderr.take().map(|pipe| tokio::spawn(read_all(pipe)));

    let status = match tokio::time::timeout(timeout, child.wait()).await {
        Ok(status) => status?,
        Err(_) => {
            let _ = child.kill().await;
            return Err(SearchError::Execution {
                reason: format!("timed out after {:?}", timeout),
            });
        }
    };

    Ok(ProcessOutput {
        status,
        stdout: collect(stdout).await,
        stderr: collect(stderr).await,
    })
}

async fn read_all<R: AsyncRead + Unpin>(mut pipe: R) -> String {
    let mut buffer = Vec::new();
    let _ = pipe.read_to_end(&mut buffer).await;
    String::from_utf8_lossy(&buffer).into_owned()
}

async fn collect(reader: Option<JoinHandle<String>>) -> String {
    match reader {
        Some(handle) => handle.await.unwrap_or_default(),
        None => String::new(),
    }
}
