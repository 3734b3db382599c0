// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sk command engine: expansion, dispatch, pipelines and background jobs

mod builtins;
mod config;
mod context;
mod engine;
pub mod env;
mod error;
mod expand;
mod observer;
mod pipeline;
mod registry;

pub use config::{EngineConfig, DEFAULT_MAX_DEPTH};
pub use context::{DepthGuard, ExecContext};
pub use engine::{Engine, EngineBuilder};
pub use error::{CommandError, EngineError};
pub use expand::{resolve_aliases, ExpandOutcome, Expander};
pub use observer::{ExecutionObserver, ExecutionRecord, LogObserver};
pub use registry::{command_fn, Command, CommandSpec, FnCommand, Invocation, Output, Registry};

pub use sk_core::{AliasTable, JobError, JobId, JobManager, JobSnapshot, JobStatus, VarStore};
pub use sk_shell::{ParseError, Parser};
