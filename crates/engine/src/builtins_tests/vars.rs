// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{fail, run};
use crate::engine::Engine;
use crate::error::{CommandError, EngineError};

#[tokio::test]
async fn set_then_read_back() {
    let engine = Engine::new();
    assert_eq!(run(&engine, "set @greeting hello world; print @greeting").await, "hello world");
    assert_eq!(engine.vars().get("@greeting").as_deref(), Some("hello world"));
}

#[tokio::test]
async fn bare_names_are_the_same_variable() {
    let engine = Engine::new();
    run(&engine, "set color red").await;
    assert_eq!(run(&engine, "print @color").await, "red");
}

#[tokio::test]
async fn set_does_not_expand_the_name_it_assigns() {
    let engine = Engine::new();
    run(&engine, "set @n 1").await;
    run(&engine, "set @n $((@n + 1))").await;
    run(&engine, "set @n $((@n * 10))").await;
    assert_eq!(run(&engine, "print @n").await, "20");
}

#[yare::parameterized(
    arithmetic = { "set @v $((7 / 2))",              "3" },
    div_zero   = { "set @v $((1 / 0))",              "0" },
    command    = { "set @v $(print nested)",         "nested" },
    exec_token = { "set @v @exec:print token",       "token" },
    literal    = { "set @v 'a | b'",                 "a | b" },
)]
fn set_expands_values(line: &str, expected: &str) {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    rt.block_on(async {
        let engine = Engine::new();
        run(&engine, line).await;
        assert_eq!(engine.vars().get("@v").as_deref(), Some(expected));
    });
}

#[tokio::test]
async fn set_requires_name_and_value() {
    let engine = Engine::new();
    for line in ["set", "set @x", "set @ value"] {
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

#[tokio::test]
async fn unset_leaves_the_reference_literal() {
    let engine = Engine::new();
    run(&engine, "set @x 1; set @y 2").await;
    run(&engine, "unset @x y").await;
    assert_eq!(run(&engine, "print @x @y").await, "@x @y");
    assert!(engine.vars().is_empty());
}

#[tokio::test]
async fn unset_unknown_variable_fails() {
    let engine = Engine::new();
    let err = fail(&engine, "unset @ghost").await;
    assert_eq!(err.to_string(), "unset: no such variable: @ghost");
}

#[tokio::test]
async fn vars_lists_sorted_bindings() {
    let engine = Engine::new();
    run(&engine, "set @b 2; set @a 1").await;
    assert_eq!(run(&engine, "vars").await, "@a=1\n@b=2");
}

#[tokio::test]
async fn alias_define_show_and_use() {
    let engine = Engine::new();
    run(&engine, "alias ll=print long").await;
    assert_eq!(run(&engine, "alias ll").await, "ll=print long");
    assert_eq!(run(&engine, "ll listing").await, "long listing");

    run(&engine, "alias 'hi there=print exact'").await;
    assert_eq!(run(&engine, "hi there").await, "exact");
}

#[tokio::test]
async fn quoted_alias_keeps_its_pipeline() {
    let engine = Engine::new();
    run(&engine, r#"alias pick='print "a\nb\nc" | grep b'"#).await;
    assert_eq!(engine.aliases().get("pick").as_deref(), Some(r#"print "a\nb\nc" | grep b"#));
    assert_eq!(run(&engine, "pick").await, "b");
}

#[tokio::test]
async fn aliases_list_and_remove() {
    let engine = Engine::new();
    run(&engine, "alias b=print b").await;
    run(&engine, "alias a=print a").await;
    assert_eq!(run(&engine, "aliases").await, "a=print a\nb=print b");
    assert_eq!(run(&engine, "alias").await, "a=print a\nb=print b");

    run(&engine, "unalias a").await;
    assert_eq!(run(&engine, "aliases").await, "b=print b");
    let err = fail(&engine, "unalias a").await;
    assert_eq!(err.to_string(), "unalias: no such alias: a");
}

#[tokio::test]
async fn alias_errors() {
    let engine = Engine::new();
    assert_eq!(
        fail(&engine, "alias missing").await.to_string(),
        "alias: no such alias: missing"
    );
    assert!(matches!(
        fail(&engine, "alias =x").await,
        EngineError::Dispatch {
            source: CommandError::Usage(_),
            ..
        }
    ));
}
