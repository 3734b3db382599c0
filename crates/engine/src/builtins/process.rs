// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! OS processes and timing: `sh`, `spawn`, `sleep`.

use super::command_line;
use crate::error::CommandError;
use crate::registry::{Command, CommandSpec, Invocation, Output, Registry};
use async_trait::async_trait;
use sk_core::{JobError, JobHandle};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};
use tokio::process::Command as Process;

pub(super) fn register(registry: &mut Registry) {
    registry.register(
        CommandSpec::new("sh", "sh <cmdline>: run a shell command, stdout and stderr merged"),
        Sh,
    );
    registry.register(
        CommandSpec::new("spawn", "spawn <cmdline>: run a shell command as a background job"),
        Spawn,
    );
    registry.register(CommandSpec::new("sleep", "sleep <ms>: pause"), Sleep);
}

fn shell_command(shell: &str, cmdline: &str) -> Process {
    let mut cmd = Process::new(shell);
    cmd.arg("-c").arg(cmdline).kill_on_drop(true);
    cmd
}

struct Sh;

#[async_trait]
impl Command for Sh {
    async fn run(&self, inv: Invocation) -> Result<Output, CommandError> {
        let cmdline = command_line(&inv.args).ok_or_else(|| CommandError::usage("sh <cmdline>"))?;
        let mut cmd = shell_command(&inv.engine.config().shell, &cmdline);
        cmd.stdin(if inv.stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

        let mut child = cmd.spawn()?;
        tracing::debug!(pid = child.id(), cmdline = cmdline.as_str(), "sh started");
        if let (Some(mut pipe), Some(input)) = (child.stdin.take(), inv.stdin.clone()) {
            // Fed from a separate task so a large input cannot deadlock
            // against a full stdout pipe.
            tokio::spawn(async move {
                let _ = pipe.write_all(input.as_bytes()).await;
            });
        }

        // Dropping the child on cancellation kills it.
        let output = tokio::select! {
            output = child.wait_with_output() => output?,
            _ = inv.cx.token().cancelled() => return Err(CommandError::Cancelled),
        };
        let out = Output {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        if output.status.success() {
            Ok(out)
        } else {
            Err(CommandError::Exit {
                status: output.status.code().unwrap_or(-1),
                output: out.merged(),
            })
        }
    }
}

struct Spawn;

#[async_trait]
impl Command for Spawn {
    async fn run(&self, inv: Invocation) -> Result<Output, CommandError> {
        let cmdline =
            command_line(&inv.args).ok_or_else(|| CommandError::usage("spawn <cmdline>"))?;
        let shell = inv.engine.config().shell.clone();
        let label = cmdline.clone();
        let id = inv
            .engine
            .jobs()
            .launch(label, move |handle| run_process_job(shell, cmdline, handle));
        Ok(Output::text(format!("[{id}]")))
    }
}

/// Drive an OS process as a job: record its pid, stream both output
/// channels into the job line by line, kill it when the job is killed.
async fn run_process_job(shell: String, cmdline: String, handle: JobHandle) -> Result<(), JobError> {
    let mut child = shell_command(&shell, &cmdline)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| JobError::Failed(format!("failed to start {shell}: {e}")))?;
    if let Some(pid) = child.id() {
        handle.set_pid(pid);
    }

    let mut stdout = child.stdout.take().map(OutputLines::new);
    let mut stderr = child.stderr.take().map(OutputLines::new);

    while stdout.is_some() || stderr.is_some() {
        tokio::select! {
            line = next_line(&mut stdout), if stdout.is_some() => match line.map_err(read_failed)? {
                Some(line) => handle.append(&line),
                None => stdout = None,
            },
            line = next_line(&mut stderr), if stderr.is_some() => match line.map_err(read_failed)? {
                Some(line) => handle.append(&line),
                None => stderr = None,
            },
            _ = handle.cancelled() => {
                let _ = child.kill().await;
                return Err(JobError::Killed);
            }
        }
    }

    let status = tokio::select! {
        status = child.wait() => status.map_err(|e| JobError::Failed(e.to_string()))?,
        _ = handle.cancelled() => {
            let _ = child.kill().await;
            return Err(JobError::Killed);
        }
    };
    if status.success() {
        Ok(())
    } else {
        Err(JobError::Failed(format!(
            "exited with status {}",
            status.code().unwrap_or(-1)
        )))
    }
}

/// One output pipe read line by line. Bytes that are not valid UTF-8 are
/// replaced instead of ending the stream.
struct OutputLines<R> {
    reader: BufReader<R>,
    buf: Vec<u8>,
}

impl<R: AsyncRead + Unpin> OutputLines<R> {
    fn new(pipe: R) -> Self {
        Self {
            reader: BufReader::new(pipe),
            buf: Vec::new(),
        }
    }

    /// Next line with a trailing `\n`, or `None` at end of stream.
    ///
    /// Bytes of an interrupted read stay in `buf`, so a dropped call loses
    /// nothing and this can race in `select!`.
    async fn next(&mut self) -> std::io::Result<Option<String>> {
        self.reader.read_until(b'\n', &mut self.buf).await?;
        if self.buf.is_empty() {
            return Ok(None);
        }
        let bytes = std::mem::take(&mut self.buf);
        let mut line = String::from_utf8_lossy(&bytes).into_owned();
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        line.push('\n');
        Ok(Some(line))
    }
}

async fn next_line<R: AsyncRead + Unpin>(
    lines: &mut Option<OutputLines<R>>,
) -> std::io::Result<Option<String>> {
    match lines {
        Some(lines) => lines.next().await,
        None => Ok(None),
    }
}

fn read_failed(e: std::io::Error) -> JobError {
    JobError::Failed(format!("cannot read output: {e}"))
}

struct Sleep;

#[async_trait]
impl Command for Sleep {
    async fn run(&self, inv: Invocation) -> Result<Output, CommandError> {
        let ms: u64 = inv
            .require(0, "sleep <ms>")?
            .parse()
            .map_err(|_| CommandError::usage("sleep <ms>"))?;
        tokio::select! {
            _ = tokio::time::sleep(Duration::from_millis(ms)) => Ok(Output::empty()),
            _ = inv.cx.token().cancelled() => Err(CommandError::Cancelled),
        }
    }
}
