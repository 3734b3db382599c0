// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Feeding lines to the engine from arguments, scripts or stdin.

use crate::output::{LineReport, OutputFormat};
use anyhow::{Context, Result};
use sk_engine::Engine;
use std::io::{IsTerminal, Write};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

const PROMPT: &str = "sk> ";

/// Run one line, cancelling it on Ctrl-C, and print its result.
pub async fn run_line(engine: &Engine, line: &str, format: OutputFormat) -> LineReport {
    let token = CancellationToken::new();
    let interrupt = {
        let token = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("interrupted");
                token.cancel();
            }
        })
    };

    let result = engine.execute_with_context(&token, line, None).await;
    interrupt.abort();

    let report = LineReport::new(line, result);
    if let Some(error) = &report.error {
        tracing::debug!(line, error = %error, "line failed");
    }
    report.print(format);
    report
}

/// Run lines in order, stopping at the first failure. Blank and
/// comment-only lines are skipped.
///
/// Returns the exit code of the last line run.
pub async fn run_all<'a>(
    engine: &Engine,
    lines: impl IntoIterator<Item = &'a str>,
    format: OutputFormat,
) -> i32 {
    for line in lines {
        if is_blank(line) {
            continue;
        }
        let report = run_line(engine, line, format).await;
        if !report.ok {
            return report.exit_code();
        }
    }
    0
}

/// Read lines from stdin until EOF, running each one.
///
/// Failures do not stop the loop; the exit code is that of the last line.
/// A prompt goes to stderr when stdin is a terminal.
pub async fn run_stdin(engine: &Engine, format: OutputFormat) -> Result<i32> {
    let interactive = std::io::stdin().is_terminal();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut status = 0;

    loop {
        if interactive {
            eprint!("{PROMPT}");
            let _ = std::io::stderr().flush();
        }
        let Some(line) = lines.next_line().await.context("reading stdin")? else {
            break;
        };
        if is_blank(&line) {
            continue;
        }
        status = run_line(engine, &line, format).await.exit_code();
    }
    if interactive {
        eprintln!();
    }
    Ok(status)
}

fn is_blank(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}
