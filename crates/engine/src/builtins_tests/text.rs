// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{fail, run};
use crate::builtins::text::unescape;
use crate::engine::Engine;
use crate::error::{CommandError, EngineError};

#[yare::parameterized(
    newline   = { r"a\nb",   "a\nb" },
    tab       = { r"a\tb",   "a\tb" },
    backslash = { r"a\\n",   r"a\n" },
    unknown   = { r"a\qb",   r"a\qb" },
    trailing  = { r"a\",     r"a\" },
)]
fn unescaping(input: &str, expected: &str) {
    assert_eq!(unescape(input), expected);
}

#[tokio::test]
async fn print_joins_arguments() {
    let engine = Engine::new();
    assert_eq!(run(&engine, "print a   'b  c' d").await, "a b  c d");
}

#[tokio::test]
async fn print_without_arguments_echoes_stdin() {
    let engine = Engine::new();
    assert_eq!(run(&engine, "print piped | print").await, "piped");
    assert_eq!(run(&engine, "print").await, "");
}

#[tokio::test]
async fn grep_filters_piped_lines() {
    let engine = Engine::new();
    let out = run(&engine, r#"print "line1\nline2\nline3" | grep line2"#).await;
    assert_eq!(out, "line2");
}

#[yare::parameterized(
    plain        = { "grep an",        "banana\nmango" },
    invert       = { "grep -v an",     "cherry\nMANGO!" },
    ignore_case  = { "grep -i mango",  "mango\nMANGO!" },
    combined     = { "grep -vi mango", "banana\ncherry" },
    no_match     = { "grep kiwi",      "" },
    dashes       = { "grep -- -x",     "" },
    quoted       = { "grep 'GO!'",     "MANGO!" },
)]
fn grep_flags(command: &str, expected: &str) {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    rt.block_on(async {
        let engine = Engine::new();
        let line = format!(r#"print "banana\ncherry\nmango\nMANGO!" | {command}"#);
        assert_eq!(run(&engine, &line).await, expected);
    });
}

#[tokio::test]
async fn grep_rejects_bad_usage() {
    let engine = Engine::new();
    for line in ["print a | grep", "print a | grep -x a", "print a | grep -v"] {
        let err = fail(&engine, line).await;
        assert!(
            matches!(
                err,
                EngineError::Dispatch {
                    source: CommandError::Usage(_),
                    ..
                }
            ),
            "{line}: {err}"
        );
    }
}
