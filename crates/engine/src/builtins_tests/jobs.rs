// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{fail, run};
use crate::engine::Engine;
use sk_core::{JobId, JobStatus};
use std::time::Duration;

fn id(n: u64) -> JobId {
    JobId::new(n)
}

#[tokio::test]
async fn bg_returns_an_id_and_wait_prints_output() {
    let engine = Engine::new();
    assert_eq!(run(&engine, "bg 'print hi | grep h'").await, "[1]");
    assert_eq!(run(&engine, "job wait 1").await, "hi");
    assert_eq!(run(&engine, "job logs %1").await, "hi");
    assert_eq!(engine.jobs().get(id(1)).unwrap().command, "print hi | grep h");
}

#[tokio::test]
async fn bg_requotes_several_arguments() {
    let engine = Engine::new();
    run(&engine, "bg print 'two words'").await;
    run(&engine, "job wait 1").await;
    let job = engine.jobs().get(id(1)).unwrap();
    assert_eq!(job.command, "print 'two words'");
    assert_eq!(engine.jobs().logs(id(1)).unwrap(), "two words");
}

#[tokio::test]
async fn bg_does_not_expand_its_line_early() {
    let engine = Engine::new();
    run(&engine, "set @x before").await;
    run(&engine, "bg 'print @x'").await;
    assert_eq!(engine.jobs().get(id(1)).unwrap().command, "print @x");
    run(&engine, "job wait 1").await;
}

#[tokio::test]
async fn bg_without_a_line_is_a_usage_error() {
    let engine = Engine::new();
    assert_eq!(fail(&engine, "bg").await.to_string(), "bg: usage: bg <line>");
}

#[tokio::test]
async fn listing_shows_every_job() {
    let engine = Engine::new();
    run(&engine, "bg 'print a'").await;
    run(&engine, "bg 'print b'").await;
    run(&engine, "job wait 1; job wait 2").await;

    let out = run(&engine, "jobs").await;
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2, "{out}");
    assert!(lines[0].starts_with("[1] completed"), "{out}");
    assert!(lines[1].ends_with("print b"), "{out}");
    assert_eq!(run(&engine, "job list").await, out);
}

#[tokio::test]
async fn show_describes_a_job() {
    let engine = Engine::new();
    run(&engine, "bg 'print shown'").await;
    run(&engine, "job wait 1").await;

    let text = run(&engine, "job show 1").await;
    assert!(text.contains("command:  print shown"), "{text}");
    assert!(text.contains("status:   completed"), "{text}");
    assert!(text.contains("output:   5 bytes"), "{text}");

    let json: serde_json::Value = serde_json::from_str(&run(&engine, "job show 1 --json").await).unwrap();
    assert_eq!(json["id"], 1);
    assert_eq!(json["status"], "completed");
    assert_eq!(json["command"], "print shown");
}

#[tokio::test]
async fn show_rejects_bad_input() {
    let engine = Engine::new();
    assert_eq!(
        fail(&engine, "job show abc").await.to_string(),
        "job show: invalid job id: \"abc\""
    );
    assert_eq!(
        fail(&engine, "job show 7").await.to_string(),
        "job show: no such job: 7"
    );
    run(&engine, "bg 'print x'").await;
    assert_eq!(
        fail(&engine, "job show 1 --yaml").await.to_string(),
        "job show: usage: job show <id> [--json]"
    );
}

#[tokio::test]
async fn kill_stops_a_running_job() {
    let engine = Engine::new();
    run(&engine, "bg 'sleep 60000'").await;
    assert_eq!(run(&engine, "job kill 1").await, "[1] killed");

    let job = engine.jobs().get(id(1)).unwrap();
    assert_eq!(job.status, JobStatus::Killed);
    assert_eq!(
        fail(&engine, "job wait 1").await.to_string(),
        "job wait: killed"
    );
}

#[tokio::test]
async fn kill_of_a_finished_job_fails() {
    let engine = Engine::new();
    run(&engine, "bg 'print done'").await;
    run(&engine, "job wait 1").await;
    assert_eq!(
        fail(&engine, "job kill 1").await.to_string(),
        "job kill: job 1 already completed"
    );
    assert_eq!(engine.jobs().get(id(1)).unwrap().status, JobStatus::Completed);
}

#[tokio::test]
async fn failed_job_surfaces_through_wait() {
    let engine = Engine::new();
    run(&engine, "bg 'print partial; nope'").await;
    let err = fail(&engine, "job wait 1").await;
    assert_eq!(err.to_string(), "job wait: unknown command: nope");
    assert_eq!(engine.jobs().get(id(1)).unwrap().status, JobStatus::Failed);
    assert_eq!(engine.jobs().logs(id(1)).unwrap(), "partial");
}

#[tokio::test]
async fn prune_removes_finished_jobs_only() {
    let engine = Engine::new();
    run(&engine, "bg 'print quick'").await;
    run(&engine, "bg 'sleep 60000'").await;
    run(&engine, "job wait 1").await;

    assert_eq!(run(&engine, "job prune").await, "pruned 1 job(s)");
    assert!(engine.jobs().get(id(1)).is_none());
    assert!(engine.jobs().get(id(2)).is_some());
    engine.jobs().kill(id(2)).await.unwrap();
}

#[tokio::test]
async fn wait_is_cancelled_with_its_caller() {
    let engine = Engine::new();
    run(&engine, "bg 'sleep 60000'").await;

    let token = tokio_util::sync::CancellationToken::new();
    let waiter = {
        let engine = engine.clone();
        let token = token.clone();
        tokio::spawn(async move { engine.execute_with_context(&token, "job wait 1", None).await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    token.cancel();

    let err = waiter.await.unwrap().unwrap_err();
    assert!(err.is_cancelled());
    assert_eq!(engine.jobs().get(id(1)).unwrap().status, JobStatus::Running);
    engine.jobs().kill(id(1)).await.unwrap();
}

#[tokio::test]
async fn background_jobs_continue_from_the_launching_depth() {
    let line = r#"print '@exec:bg "print @exec:inner"'"#;

    // `bg` runs at depth 2, the job line at 3 and its `@exec:` at 4.
    let engine = Engine::builder().max_depth(3).build();
    engine.aliases().set("inner", "print inner");
    assert_eq!(run(&engine, line).await, "[1]");
    let err = fail(&engine, "job wait 1").await;
    assert!(err.to_string().contains("execution depth"), "{err}");

    let engine = Engine::builder().max_depth(4).build();
    engine.aliases().set("inner", "print inner");
    assert_eq!(run(&engine, line).await, "[1]");
    run(&engine, "job wait 1").await;
    assert_eq!(engine.jobs().logs(id(1)).unwrap(), "inner");
}

#[tokio::test]
async fn job_logs_show_finished_chains_while_running() {
    let engine = Engine::new();
    run(&engine, "bg 'print first; print second; sleep 60000'").await;

    let mut logs = String::new();
    for _ in 0..200 {
        logs = run(&engine, "job logs 1").await;
        if logs == "first\nsecond" {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(logs, "first\nsecond");
    assert_eq!(engine.jobs().get(id(1)).unwrap().status, JobStatus::Running);
    engine.jobs().kill(id(1)).await.unwrap();
}
