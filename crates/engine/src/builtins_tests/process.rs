// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{fail, run};
use crate::engine::Engine;
use crate::error::{CommandError, EngineError};
use sk_core::{JobError, JobId, JobStatus};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn sh_captures_stdout() {
    let engine = Engine::new();
    assert_eq!(run(&engine, "sh 'echo hello'").await, "hello");
    assert_eq!(run(&engine, "sh echo 'a  b'").await, "a  b");
}

#[tokio::test]
async fn sh_reads_piped_stdin() {
    let engine = Engine::new();
    assert_eq!(run(&engine, "print shout | sh 'tr a-z A-Z'").await, "SHOUT");
}

#[tokio::test]
async fn sh_merges_stderr_after_stdout() {
    let engine = Engine::new();
    let out = run(&engine, "sh 'echo err >&2; echo out'").await;
    assert_eq!(out, "out\nerr");
}

#[tokio::test]
async fn sh_failure_keeps_what_was_printed() {
    let engine = Engine::new();
    let err = fail(&engine, "print before; sh 'echo partial; exit 3'").await;
    assert!(
        matches!(
            err,
            EngineError::Dispatch {
                source: CommandError::Exit { status: 3, .. },
                ..
            }
        ),
        "{err}"
    );
    assert_eq!(err.to_string(), "sh: exited with status 3");
    assert_eq!(err.output(), "before\npartial");
}

#[tokio::test]
async fn sh_uses_the_configured_shell() {
    let engine = Engine::builder().shell("/bin/sh").build();
    assert_eq!(run(&engine, "sh 'echo $0'").await, "/bin/sh");

    let missing = Engine::builder().shell("/no/such/shell").build();
    let err = fail(&missing, "sh 'echo hi'").await;
    assert!(
        matches!(
            err,
            EngineError::Dispatch {
                source: CommandError::Io(_),
                ..
            }
        ),
        "{err}"
    );
}

#[tokio::test]
async fn spawn_streams_output_into_the_job() {
    let engine = Engine::new();
    assert_eq!(run(&engine, "spawn 'echo one; echo two'").await, "[1]");
    engine.jobs().wait(JobId::new(1)).await.unwrap();

    let job = engine.jobs().get(JobId::new(1)).unwrap();
    assert_eq!(job.status, JobStatus::Completed);
    assert!(job.pid.is_some());
    assert_eq!(engine.jobs().logs(JobId::new(1)).unwrap(), "one\ntwo\n");
    assert_eq!(run(&engine, "job logs 1").await, "one\ntwo");
}

#[tokio::test]
async fn spawn_keeps_reading_past_invalid_utf8() {
    let engine = Engine::new();
    run(&engine, r#"spawn 'printf "a\n\377\nb\nc\n"'"#).await;
    engine.jobs().wait(JobId::new(1)).await.unwrap();

    assert_eq!(
        engine.jobs().get(JobId::new(1)).unwrap().status,
        JobStatus::Completed
    );
    assert_eq!(
        engine.jobs().logs(JobId::new(1)).unwrap(),
        "a\n\u{FFFD}\nb\nc\n"
    );
}

#[tokio::test]
async fn spawn_records_a_non_zero_exit() {
    let engine = Engine::new();
    run(&engine, "spawn 'exit 2'").await;
    let err = engine.jobs().wait(JobId::new(1)).await.unwrap_err();
    assert_eq!(err, JobError::Failed("exited with status 2".to_string()));
}

#[tokio::test]
async fn killing_a_spawned_job_stops_the_process() {
    let engine = Engine::new();
    run(&engine, "spawn 'sleep 30'").await;
    let id = JobId::new(1);
    tokio::time::sleep(Duration::from_millis(50)).await;

    let started = Instant::now();
    engine.jobs().kill(id).await.unwrap();
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(engine.jobs().get(id).unwrap().status, JobStatus::Killed);
    assert_eq!(engine.jobs().wait(id).await, Err(JobError::Killed));
}

#[tokio::test]
async fn sleep_pauses_and_prints_nothing() {
    let engine = Engine::new();
    let started = Instant::now();
    assert_eq!(run(&engine, "sleep 30").await, "");
    assert!(started.elapsed() >= Duration::from_millis(30));
}

#[tokio::test]
async fn sleep_needs_milliseconds() {
    let engine = Engine::new();
    for line in ["sleep", "sleep soon"] {
        assert_eq!(
            fail(&engine, line).await.to_string(),
            "sleep: usage: sleep <ms>"
        );
    }
}

#[tokio::test]
async fn sleep_stops_when_cancelled() {
    let engine = Engine::new();
    let token = CancellationToken::new();
    let canceller = {
        let token = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            token.cancel();
        })
    };
    let started = Instant::now();
    let err = engine
        .execute_with_context(&token, "print first; sleep 60000; print never", None)
        .await
        .unwrap_err();
    canceller.await.unwrap();

    assert!(err.is_cancelled());
    assert_eq!(err.output(), "first");
    assert!(started.elapsed() < Duration::from_secs(5));
}
