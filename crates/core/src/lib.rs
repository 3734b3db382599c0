// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sk-core: job tracking and shared stores for the sk command engine

pub mod id;
pub mod job;
pub mod jobs;
pub mod store;
pub mod time_fmt;

pub use id::{JobId, ParseJobIdError};
pub use job::{JobError, JobSnapshot, JobStatus};
pub use jobs::{JobHandle, JobManager, DEFAULT_KILL_GRACE, DEFAULT_OUTPUT_LIMIT};
pub use store::{AliasTable, VarStore};
pub use time_fmt::format_duration;
