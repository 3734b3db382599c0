// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn guards_count_nesting() {
    let cx = ExecContext::new(CancellationToken::new());
    assert_eq!(cx.depth(), 0);
    {
        let outer = cx.enter(3).unwrap();
        assert_eq!(outer.level(), 1);
        let inner = cx.clone().enter(3).unwrap();
        assert_eq!(inner.level(), 2);
        assert_eq!(cx.depth(), 2);
    }
    assert_eq!(cx.depth(), 0);
}

#[test]
fn exceeding_the_ceiling_fails_and_releases() {
    let cx = ExecContext::new(CancellationToken::new());
    let _a = cx.enter(2).unwrap();
    let _b = cx.enter(2).unwrap();
    match cx.enter(2) {
        Err(EngineError::RecursionExceeded { max }) => assert_eq!(max, 2),
        other => panic!("expected RecursionExceeded, got {other:?}"),
    }
    assert_eq!(cx.depth(), 2);
}

#[test]
fn separate_contexts_do_not_share_depth() {
    let a = ExecContext::new(CancellationToken::new());
    let b = ExecContext::new(CancellationToken::new());
    let _g = a.enter(1).unwrap();
    assert!(b.enter(1).is_ok());
}

#[test]
fn guard_released_on_panic() {
    let cx = ExecContext::new(CancellationToken::new());
    let inner = cx.clone();
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
        let _g = inner.enter(5).unwrap();
        panic!("boom");
    }));
    assert!(result.is_err());
    assert_eq!(cx.depth(), 0);
}

#[test]
fn cancellation_is_shared_by_clones() {
    let token = CancellationToken::new();
    let cx = ExecContext::new(token.clone());
    let nested = cx.clone();
    token.cancel();
    assert!(nested.is_cancelled());
}

#[test]
fn base_depth_counts_against_the_ceiling() {
    let cx = ExecContext::with_base_depth(CancellationToken::new(), 2);
    assert_eq!(cx.depth(), 2);
    let guard = cx.enter(3).unwrap();
    assert_eq!(guard.level(), 3);
    assert!(matches!(
        cx.enter(3),
        Err(EngineError::RecursionExceeded { max: 3 })
    ));
    drop(guard);
    assert_eq!(cx.depth(), 2);
}
