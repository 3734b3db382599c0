// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::engine::Engine;
use crate::error::EngineError;

mod jobs;
#[cfg(unix)]
mod process;
mod text;
mod vars;

async fn run(engine: &Engine, line: &str) -> String {
    match engine.execute(line, None).await {
        Ok(out) => out,
        Err(e) => panic!("{line:?} failed: {e}"),
    }
}

async fn fail(engine: &Engine, line: &str) -> EngineError {
    match engine.execute(line, None).await {
        Ok(out) => panic!("{line:?} should fail, printed {out:?}"),
        Err(e) => e,
    }
}

#[yare::parameterized(
    empty      = { &[],                       None },
    blank      = { &["  "],                   None },
    verbatim   = { &["print a | grep a"],     Some("print a | grep a") },
    requoted   = { &["print", "a b", "c"],    Some("print 'a b' c") },
)]
fn command_lines(args: &[&str], expected: Option<&str>) {
    let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
    assert_eq!(command_line(&args).as_deref(), expected);
}

#[tokio::test]
async fn help_lists_every_command() {
    let engine = Engine::new();
    let out = run(&engine, "help").await;
    for name in ["print", "grep", "set", "alias", "bg", "job wait", "sh", "spawn", "sleep"] {
        assert!(
            out.lines().any(|l| l.starts_with(name)),
            "{name} missing from:\n{out}"
        );
    }
    assert_eq!(out.lines().count(), engine.registry().len());
}
