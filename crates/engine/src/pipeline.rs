// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline executor: runs parsed chains stage by stage.
//!
//! Each stage gets the previous stage's output as stdin. Cancellation is
//! checked before every stage; a cancelled chain returns the output of the
//! last stage that finished. A failing stage stops the line; the error
//! carries the output of the chains that already finished. A chain with a
//! redirect writes its output to the file and still returns it.

use crate::context::ExecContext;
use crate::engine::Engine;
use crate::error::{join_output, EngineError};
use crate::registry::Invocation;
use sk_core::VarStore;
use sk_shell::{Chain, ParsedCommand, ParsedLine, Redirect};
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;
use tracing::Instrument;

/// Receives each chain's output as soon as the chain finishes.
pub(crate) type ChainSink<'a> = &'a (dyn Fn(&str) + Send + Sync);

pub(crate) async fn run_chains(
    engine: &Engine,
    cx: &ExecContext,
    line: &ParsedLine,
    scope: Option<&VarStore>,
    on_chain: Option<ChainSink<'_>>,
) -> Result<String, EngineError> {
    let mut combined = String::new();
    for chain in &line.chains {
        let output = run_chain(engine, cx, chain, scope)
            .await
            .map_err(|e| e.with_earlier_output(&combined))?;
        if let Some(redirect) = &chain.redirect {
            write_redirect(engine, cx, redirect, &output, scope).await?;
        }
        if let Some(report) = on_chain {
            report(&output);
        }
        combined = join_output(&combined, &output);
    }
    Ok(combined)
}

async fn run_chain(
    engine: &Engine,
    cx: &ExecContext,
    chain: &Chain,
    scope: Option<&VarStore>,
) -> Result<String, EngineError> {
    let mut stdin: Option<String> = None;
    for (index, stage) in chain.stages().enumerate() {
        if cx.is_cancelled() {
            tracing::debug!(stage = index, "cancelled before stage");
            return Err(EngineError::Cancelled {
                output: stdin.take().unwrap_or_default(),
            });
        }
        let output = run_stage(engine, cx, stage, stdin.take(), scope)
            .instrument(tracing::debug_span!("stage", stage = index, command = stage.name.as_str()))
            .await?;
        stdin = Some(output);
    }
    Ok(stdin.unwrap_or_default())
}

async fn run_stage(
    engine: &Engine,
    cx: &ExecContext,
    stage: &ParsedCommand,
    stdin: Option<String>,
    scope: Option<&VarStore>,
) -> Result<String, EngineError> {
    // A variable used as the command name may expand to several words
    // (`@ls` -> `job list`); those words take part in name lookup.
    let head = engine.expand_text(cx, &stage.name, scope).await?;
    let mut words: Vec<String> = head.split_whitespace().map(String::from).collect();
    if words.is_empty() {
        words.push(head);
    }
    let head_len = words.len();
    words.extend(stage.args.iter().cloned());

    let Some((registered, used)) = engine.registry().resolve(&words) else {
        return Err(EngineError::UnknownCommand(words.swap_remove(0)));
    };
    let spec = registered.spec.clone();
    let handler = registered.handler.clone();

    let mut args = Vec::with_capacity(words.len().saturating_sub(used));
    for (i, word) in words.into_iter().enumerate().skip(used) {
        if i < head_len || spec.raw_args {
            args.push(word);
        } else {
            args.push(engine.expand_text(cx, &word, scope).await?);
        }
    }

    let invocation = Invocation {
        engine: engine.clone(),
        name: spec.name.clone(),
        args,
        stdin,
        scope: scope.cloned(),
        cx: cx.clone(),
    };
    tracing::trace!(?invocation, "dispatch");

    match handler.run(invocation).await {
        Ok(output) => Ok(output.merged()),
        Err(e) if e.is_cancelled() => Err(EngineError::Cancelled {
            output: e.partial_output().to_string(),
        }),
        Err(e) => Err(EngineError::Dispatch {
            command: spec.name,
            output: e.partial_output().to_string(),
            source: e,
        }),
    }
}

/// Write chain output to the redirect target: `>` truncates, `>>` appends.
/// Non-empty output gets a trailing newline in the file.
async fn write_redirect(
    engine: &Engine,
    cx: &ExecContext,
    redirect: &Redirect,
    output: &str,
    scope: Option<&VarStore>,
) -> Result<(), EngineError> {
    let target = engine.expand_text(cx, &redirect.target, scope).await?;
    let path = PathBuf::from(target);
    let io_err = |source| EngineError::Redirect {
        path: path.clone(),
        source,
    };

    let mut options = tokio::fs::OpenOptions::new();
    options.create(true);
    if redirect.append {
        options.append(true);
    } else {
        options.write(true).truncate(true);
    }
    let mut file = options.open(&path).await.map_err(io_err)?;
    if !output.is_empty() {
        file.write_all(output.as_bytes()).await.map_err(io_err)?;
        file.write_all(b"\n").await.map_err(io_err)?;
    }
    file.flush().await.map_err(io_err)?;
    tracing::debug!(path = %path.display(), bytes = output.len(), append = redirect.append, "redirected output");
    Ok(())
}
