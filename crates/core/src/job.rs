// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job status state machine and snapshots.

use crate::id::JobId;
use crate::time_fmt::format_duration;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Lifecycle status of a background job.
///
/// ```text
/// pending ──▶ running ──┬──▶ completed
///    │                  ├──▶ failed
///    └──────────────────┴──▶ killed
/// ```
///
/// The three right-hand states are terminal: once reached, a job never
/// changes status again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Registered, work not started yet
    Pending,
    /// Work is running
    Running,
    /// Work finished normally
    Completed,
    /// Work returned an error or panicked
    Failed,
    /// Cancelled by an explicit kill request
    Killed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed | JobStatus::Killed
        )
    }

    /// Whether the state machine allows moving from `self` to `next`.
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        use JobStatus::*;
        matches!(
            (self, next),
            (Pending, Running) | (Pending, Killed) | (Running, Completed | Failed | Killed)
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "pending"),
            JobStatus::Running => write!(f, "running"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Failed => write!(f, "failed"),
            JobStatus::Killed => write!(f, "killed"),
        }
    }
}

/// Point-in-time copy of a job's observable state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSnapshot {
    pub id: JobId,
    /// Command text the job was started with
    pub command: String,
    pub status: JobStatus,
    /// OS process id, for jobs backed by a process
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,
    /// Wall-clock start, milliseconds since the Unix epoch
    pub started_at_ms: u64,
    /// Time spent so far, or total run time once terminal
    pub elapsed_ms: u64,
    /// Size of the captured output buffer
    pub output_bytes: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JobSnapshot {
    pub fn elapsed(&self) -> Duration {
        Duration::from_millis(self.elapsed_ms)
    }

    /// One-line summary used by job listings: `[3] running 2s  sleep 5000`.
    pub fn summary_line(&self) -> String {
        let mut line = format!(
            "[{}] {:<9} {:>6}  {}",
            self.id,
            self.status,
            format_duration(self.elapsed()),
            self.command
        );
        if let Some(pid) = self.pid {
            line.push_str(&format!("  (pid {pid})"));
        }
        line
    }
}

/// Errors raised by the job manager or recorded on a job.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobError {
    #[error("no such job: {0}")]
    NotFound(JobId),
    #[error("job {id} already {status}")]
    AlreadyFinished { id: JobId, status: JobStatus },
    #[error("job {0} is still active")]
    StillActive(JobId),
    #[error("{0}")]
    Failed(String),
    #[error("killed")]
    Killed,
    #[error("panicked: {0}")]
    Panicked(String),
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
