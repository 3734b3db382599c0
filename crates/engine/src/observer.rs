// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hook for telemetry or audit of top-level executions.

use serde::Serialize;
use std::time::{Duration, SystemTime};

/// Summary of one finished top-level call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionRecord {
    pub line: String,
    /// Nesting depth the call ran at (1 for top-level calls).
    pub depth: usize,
    #[serde(skip)]
    pub started_at: SystemTime,
    #[serde(rename = "elapsed_ms", serialize_with = "as_millis")]
    pub elapsed: Duration,
    pub ok: bool,
}

fn as_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

/// Receives a record after every top-level execute.
///
/// Called inline on the executing task, so implementations should hand
/// heavy work elsewhere.
pub trait ExecutionObserver: Send + Sync + 'static {
    fn on_execution(&self, record: &ExecutionRecord);
}

/// Default observer: a debug-level log line per call.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl ExecutionObserver for LogObserver {
    fn on_execution(&self, record: &ExecutionRecord) {
        tracing::debug!(
            line = record.line.as_str(),
            depth = record.depth,
            elapsed_ms = record.elapsed.as_millis() as u64,
            ok = record.ok,
            "execution finished"
        );
    }
}
