// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine configuration.

use crate::env;
use serde::{Deserialize, Serialize};
use sk_core::{DEFAULT_KILL_GRACE, DEFAULT_OUTPUT_LIMIT};
use std::time::Duration;

/// Default recursion ceiling for nested executions.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Tunables for one engine instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Deepest allowed nesting of `@exec:` / `$(..)` calls, counting the
    /// top-level call as depth 1.
    pub max_depth: usize,
    /// Bytes of output kept per job (tail), 0 for unbounded.
    pub job_output_limit: usize,
    /// How long `job kill` waits for the job to stop on its own.
    #[serde(with = "millis")]
    pub kill_grace: Duration,
    /// Program used as `<shell> -c <cmdline>` by `sh` and `spawn`.
    pub shell: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            job_output_limit: DEFAULT_OUTPUT_LIMIT,
            kill_grace: DEFAULT_KILL_GRACE,
            shell: "sh".to_string(),
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by any `SK_*` variables that are set and valid.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_depth: env::max_depth().unwrap_or(defaults.max_depth),
            job_output_limit: env::job_output_limit().unwrap_or(defaults.job_output_limit),
            kill_grace: env::kill_grace().unwrap_or(defaults.kill_grace),
            shell: env::shell().unwrap_or(defaults.shell),
        }
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
