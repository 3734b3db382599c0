// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI crate.

use std::path::PathBuf;

/// Name of the variable holding the tracing filter directives.
pub const LOG_FILTER_VAR: &str = "SK_LOG";

/// Filter used when `SK_LOG` is unset or empty.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Tracing filter directives (`SK_LOG`)
pub fn log_filter() -> Option<String> {
    std::env::var(LOG_FILTER_VAR)
        .ok()
        .filter(|s| !s.trim().is_empty())
}

/// Log file used when `--log-file` is not given (`SK_LOG_FILE`)
pub fn log_file() -> Option<PathBuf> {
    std::env::var("SK_LOG_FILE")
        .ok()
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
}
