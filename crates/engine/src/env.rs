// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the engine crate.

use std::time::Duration;

/// Recursion ceiling override (`SK_MAX_DEPTH`)
pub fn max_depth() -> Option<usize> {
    parse_var("SK_MAX_DEPTH").filter(|n| *n > 0)
}

/// Per-job output buffer cap in bytes (`SK_JOB_OUTPUT_LIMIT`, 0 = unbounded)
pub fn job_output_limit() -> Option<usize> {
    parse_var("SK_JOB_OUTPUT_LIMIT")
}

/// How long a kill waits for a job to stop (`SK_KILL_GRACE_MS`)
pub fn kill_grace() -> Option<Duration> {
    parse_var::<u64>("SK_KILL_GRACE_MS").map(Duration::from_millis)
}

/// Shell used by `sh` and `spawn` (`SK_SHELL`)
pub fn shell() -> Option<String> {
    std::env::var("SK_SHELL")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|s| s.trim().parse().ok())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
