// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    pending   = { JobStatus::Pending,   false, "pending" },
    running   = { JobStatus::Running,   false, "running" },
    completed = { JobStatus::Completed, true,  "completed" },
    failed    = { JobStatus::Failed,    true,  "failed" },
    killed    = { JobStatus::Killed,    true,  "killed" },
)]
fn status_terminal_and_display(status: JobStatus, terminal: bool, text: &str) {
    assert_eq!(status.is_terminal(), terminal);
    assert_eq!(status.to_string(), text);
}

#[yare::parameterized(
    start             = { JobStatus::Pending,   JobStatus::Running,   true },
    kill_pending      = { JobStatus::Pending,   JobStatus::Killed,    true },
    complete          = { JobStatus::Running,   JobStatus::Completed, true },
    fail              = { JobStatus::Running,   JobStatus::Failed,    true },
    kill_running      = { JobStatus::Running,   JobStatus::Killed,    true },
    skip_running      = { JobStatus::Pending,   JobStatus::Completed, false },
    restart           = { JobStatus::Completed, JobStatus::Running,   false },
    kill_completed    = { JobStatus::Completed, JobStatus::Killed,    false },
    revive_failed     = { JobStatus::Failed,    JobStatus::Running,   false },
    rekill            = { JobStatus::Killed,    JobStatus::Killed,    false },
)]
fn transitions(from: JobStatus, to: JobStatus, allowed: bool) {
    assert_eq!(from.can_transition_to(to), allowed);
}

#[test]
fn status_serializes_snake_case() {
    let json = serde_json::to_string(&JobStatus::Completed).unwrap();
    assert_eq!(json, "\"completed\"");
}

fn snapshot(status: JobStatus) -> JobSnapshot {
    JobSnapshot {
        id: JobId(3),
        command: "sleep 5000".to_string(),
        status,
        pid: None,
        started_at_ms: 1_700_000_000_000,
        elapsed_ms: 2_500,
        output_bytes: 0,
        error: None,
    }
}

#[test]
fn summary_line_has_id_status_and_command() {
    let line = snapshot(JobStatus::Running).summary_line();
    assert!(line.starts_with("[3] running"), "{line}");
    assert!(line.contains("2s"), "{line}");
    assert!(line.ends_with("sleep 5000"), "{line}");
}

#[test]
fn summary_line_includes_pid() {
    let mut snap = snapshot(JobStatus::Running);
    snap.pid = Some(4242);
    assert!(snap.summary_line().ends_with("(pid 4242)"));
}

#[test]
fn snapshot_json_skips_empty_optionals() {
    let json = serde_json::to_value(snapshot(JobStatus::Completed)).unwrap();
    assert_eq!(json["status"], "completed");
    assert!(json.get("pid").is_none());
    assert!(json.get("error").is_none());
}

#[test]
fn error_messages() {
    assert_eq!(JobError::NotFound(JobId(9)).to_string(), "no such job: 9");
    assert_eq!(
        JobError::AlreadyFinished {
            id: JobId(2),
            status: JobStatus::Completed
        }
        .to_string(),
        "job 2 already completed"
    );
    assert_eq!(JobError::Killed.to_string(), "killed");
}
