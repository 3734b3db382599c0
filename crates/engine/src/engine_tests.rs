// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::error::CommandError;
use crate::registry::{command_fn, Output};
use parking_lot::Mutex;
use sk_core::JobStatus;

#[tokio::test]
async fn executes_a_simple_line() {
    let engine = Engine::new();
    assert_eq!(engine.execute("print hello world", None).await.unwrap(), "hello world");
}

#[tokio::test]
async fn chains_join_non_empty_outputs() {
    let engine = Engine::new();
    let out = engine
        .execute("print a; set @x 1; print b", None)
        .await
        .unwrap();
    assert_eq!(out, "a\nb");
}

#[tokio::test]
async fn unknown_command_is_reported() {
    let engine = Engine::new();
    let err = engine.execute("frobnicate now", None).await.unwrap_err();
    assert!(matches!(err, EngineError::UnknownCommand(ref name) if name == "frobnicate"));
    assert_eq!(err.to_string(), "unknown command: frobnicate");
}

#[tokio::test]
async fn syntax_errors_are_reported_before_running() {
    let engine = Engine::new();
    let err = engine.execute("print a |", None).await.unwrap_err();
    assert!(matches!(err, EngineError::Syntax(_)));
}

#[tokio::test]
async fn host_commands_override_builtins() {
    let engine = Engine::builder()
        .command(
            CommandSpec::new("print", "shout"),
            command_fn(|inv| Ok(Output::text(inv.args.join(" ").to_uppercase()))),
        )
        .build();
    assert_eq!(engine.execute("print hi", None).await.unwrap(), "HI");
    assert!(engine.registry().contains("grep"));
}

#[tokio::test]
async fn builtins_can_be_left_out() {
    let engine = Engine::builder().builtins(false).build();
    assert!(engine.registry().is_empty());
    assert!(matches!(
        engine.execute("print hi", None).await,
        Err(EngineError::UnknownCommand(_))
    ));
}

#[tokio::test]
async fn recursion_is_bounded_by_default() {
    let engine = Engine::new();
    assert_eq!(engine.config().max_depth, 10);
    engine.aliases().set("again", "print @exec:again");

    let err = engine.execute("again", None).await.unwrap_err();
    assert!(err.is_recursion());
    let message = err.to_string();
    assert!(message.contains("recursion"), "{message}");
    assert!(message.contains("execution depth"), "{message}");

    // The failed call gave back all of its depth.
    assert_eq!(engine.execute("print still fine", None).await.unwrap(), "still fine");
}

#[yare::parameterized(
    at_ceiling   = { 3, Some("bottom") },
    over_ceiling = { 2, None },
)]
fn nesting_counts_each_level(max_depth: usize, expected: Option<&str>) {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    rt.block_on(async {
        let engine = Engine::builder().max_depth(max_depth).build();
        engine.aliases().set("l1", "print @exec:l2");
        engine.aliases().set("l2", "print @exec:l3");
        engine.aliases().set("l3", "print bottom");
        let result = engine.execute("l1", None).await;
        match expected {
            Some(out) => assert_eq!(result.unwrap(), out),
            None => assert!(result.unwrap_err().is_recursion()),
        }
    });
}

#[tokio::test]
async fn pre_cancelled_token_runs_nothing() {
    let engine = Engine::new();
    let token = CancellationToken::new();
    token.cancel();
    let err = engine
        .execute_with_context(&token, "print hi", None)
        .await
        .unwrap_err();
    assert!(err.is_cancelled());
    assert_eq!(err.output(), "");
}

#[derive(Default)]
struct Recorder(Mutex<Vec<ExecutionRecord>>);

impl ExecutionObserver for Arc<Recorder> {
    fn on_execution(&self, record: &ExecutionRecord) {
        self.0.lock().push(record.clone());
    }
}

#[tokio::test]
async fn observer_sees_each_top_level_call() {
    let recorder = Arc::new(Recorder::default());
    let engine = Engine::builder().observer(Arc::clone(&recorder)).build();

    engine.execute("print @exec:print x", None).await.unwrap();
    let _ = engine.execute("nope", None).await;

    let records = recorder.0.lock();
    assert_eq!(records.len(), 2, "nested calls are not reported");
    assert_eq!(records[0].line, "print @exec:print x");
    assert!(records[0].ok);
    assert_eq!(records[0].depth, 1);
    assert!(!records[1].ok);

    let json = serde_json::to_value(&records[0]).unwrap();
    assert!(json.get("elapsed_ms").is_some());
    assert!(json.get("started_at").is_none());
}

#[tokio::test]
async fn spawned_jobs_capture_output() {
    let engine = Engine::new();
    let id = engine.spawn_job("print from the background");
    engine.jobs().wait(id).await.unwrap();

    let job = engine.jobs().get(id).unwrap();
    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.command, "print from the background");
    assert_eq!(engine.jobs().logs(id).unwrap(), "from the background");
}

#[tokio::test]
async fn failing_job_records_the_error() {
    let engine = Engine::new();
    let id = engine.spawn_job("print partial; nope");
    let err = engine.jobs().wait(id).await.unwrap_err();
    assert_eq!(err, JobError::Failed("unknown command: nope".to_string()));
    assert_eq!(engine.jobs().get(id).unwrap().status, JobStatus::Failed);
}

#[tokio::test]
async fn failing_command_keeps_earlier_output_in_the_job() {
    let engine = Engine::builder()
        .command(
            CommandSpec::new("fail", "always fails"),
            command_fn(|_| Err(CommandError::failed("boom"))),
        )
        .build();
    let id = engine.spawn_job("print before; fail");
    assert!(engine.jobs().wait(id).await.is_err());
    assert_eq!(engine.jobs().logs(id).unwrap(), "before");
    assert_eq!(
        engine.jobs().get(id).unwrap().error.as_deref(),
        Some("fail: boom")
    );
}

#[tokio::test]
async fn engines_are_isolated() {
    let a = Engine::new();
    let b = Engine::new();
    a.vars().set("@x", "1");
    a.aliases().set("hi", "print hi");
    assert!(b.vars().is_empty());
    assert!(b.aliases().is_empty());
    assert_eq!(b.execute("print @x", None).await.unwrap(), "@x");
}

#[test]
fn builder_applies_settings() {
    let engine = Engine::builder()
        .max_depth(4)
        .job_output_limit(128)
        .kill_grace(Duration::from_millis(50))
        .shell("bash")
        .build();
    let config = engine.config();
    assert_eq!(config.max_depth, 4);
    assert_eq!(config.job_output_limit, 128);
    assert_eq!(config.kill_grace, Duration::from_millis(50));
    assert_eq!(config.shell, "bash");
    assert!(format!("{engine:?}").starts_with("Engine"));
}
