// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The engine: owns the stores, the registry and the job manager, and
//! runs lines through expansion, parsing and the pipeline executor.

use crate::builtins;
use crate::config::EngineConfig;
use crate::context::ExecContext;
use crate::error::EngineError;
use crate::expand::{self, Expander};
use crate::observer::{ExecutionObserver, ExecutionRecord, LogObserver};
use crate::pipeline::{self, ChainSink};
use crate::registry::{Command, CommandSpec, Registry};
use sk_core::{AliasTable, JobError, JobHandle, JobId, JobManager, VarStore};
use sk_shell::Parser;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

pub(crate) type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

struct EngineInner {
    config: EngineConfig,
    registry: Registry,
    aliases: AliasTable,
    vars: VarStore,
    expanders: Vec<Arc<dyn Expander>>,
    jobs: JobManager,
    observer: Arc<dyn ExecutionObserver>,
}

/// An isolated command engine.
///
/// Cheap to clone; clones share all state. Separate engines built with
/// [`Engine::builder`] share nothing.
#[derive(Clone)]
pub struct Engine {
    inner: Arc<EngineInner>,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.inner.config)
            .field("commands", &self.inner.registry.len())
            .field("aliases", &self.inner.aliases.len())
            .field("vars", &self.inner.vars.len())
            .field("expanders", &self.inner.expanders.len())
            .finish()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Engine with default configuration and the builtin commands.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    /// Global variables.
    pub fn vars(&self) -> &VarStore {
        &self.inner.vars
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.inner.aliases
    }

    pub fn jobs(&self) -> &JobManager {
        &self.inner.jobs
    }

    pub fn registry(&self) -> &Registry {
        &self.inner.registry
    }

    pub(crate) fn expanders(&self) -> &[Arc<dyn Expander>] {
        &self.inner.expanders
    }

    /// Run a line to completion.
    ///
    /// `scope` holds call-scoped variables, applied after the globals.
    pub async fn execute(&self, line: &str, scope: Option<&VarStore>) -> Result<String, EngineError> {
        self.execute_with_context(&CancellationToken::new(), line, scope)
            .await
    }

    /// Run a line, stopping between pipeline stages once `cancel` fires.
    ///
    /// A cancelled call returns [`EngineError::Cancelled`] carrying the
    /// output produced so far.
    pub async fn execute_with_context(
        &self,
        cancel: &CancellationToken,
        line: &str,
        scope: Option<&VarStore>,
    ) -> Result<String, EngineError> {
        self.execute_in(ExecContext::new(cancel.clone()), line, scope, None)
            .await
    }

    async fn execute_in(
        &self,
        cx: ExecContext,
        line: &str,
        scope: Option<&VarStore>,
        on_chain: Option<ChainSink<'_>>,
    ) -> Result<String, EngineError> {
        let depth = cx.depth() + 1;
        let started_at = SystemTime::now();
        let started = Instant::now();

        let result = self
            .run_line_reporting(&cx, line, scope, on_chain)
            .instrument(tracing::info_span!("execute", line, depth))
            .await;

        let record = ExecutionRecord {
            line: line.to_string(),
            depth,
            started_at,
            elapsed: started.elapsed(),
            ok: result.is_ok(),
        };
        self.inner.observer.on_execution(&record);
        if let Err(e) = &result {
            tracing::debug!(error = %e, "execution failed");
        }
        result
    }

    /// One level of execution: depth check, aliases, parse, run.
    ///
    /// Nested `@exec:` and `$(..)` calls come back through here with the
    /// same context, so they count against the same depth budget.
    pub(crate) fn run_line<'a>(
        &'a self,
        cx: &'a ExecContext,
        line: &'a str,
        scope: Option<&'a VarStore>,
    ) -> BoxFuture<'a, Result<String, EngineError>> {
        self.run_line_reporting(cx, line, scope, None)
    }

    fn run_line_reporting<'a>(
        &'a self,
        cx: &'a ExecContext,
        line: &'a str,
        scope: Option<&'a VarStore>,
        on_chain: Option<ChainSink<'a>>,
    ) -> BoxFuture<'a, Result<String, EngineError>> {
        Box::pin(async move {
            if cx.is_cancelled() {
                return Err(EngineError::Cancelled {
                    output: String::new(),
                });
            }
            let guard = cx.enter(self.inner.config.max_depth)?;
            tracing::trace!(depth = guard.level(), line, "run line");

            let aliased = expand::resolve_aliases(&self.inner.aliases, line);
            let parsed = Parser::parse(&aliased)?;
            let result = pipeline::run_chains(self, cx, &parsed, scope, on_chain).await;
            drop(guard);
            result
        })
    }

    /// Run `line` as a background job and return its id at once.
    ///
    /// The job gets its own cancellation and depth budget; it keeps running
    /// after the call that started it returns.
    pub fn spawn_job(&self, line: impl Into<String>) -> JobId {
        self.launch_job(line.into(), 0)
    }

    /// Like [`spawn_job`](Self::spawn_job), for jobs started from inside a
    /// running call.
    ///
    /// The job's depth starts where `cx` currently is, so a line that keeps
    /// rescheduling itself through `bg` fails with
    /// [`EngineError::RecursionExceeded`] instead of piling up jobs.
    pub fn spawn_job_from(&self, cx: &ExecContext, line: impl Into<String>) -> JobId {
        self.launch_job(line.into(), cx.depth())
    }

    fn launch_job(&self, line: String, base_depth: usize) -> JobId {
        let engine = self.clone();
        self.inner.jobs.launch(line.clone(), move |handle| async move {
            let cx = ExecContext::with_base_depth(handle.token().clone(), base_depth);
            let output = JobOutput::new(&handle);
            let on_chain: ChainSink<'_> = &|text: &str| output.push(text);
            match engine.execute_in(cx, &line, None, Some(on_chain)).await {
                Ok(_) => Ok(()),
                Err(e) => {
                    output.push_unreported(e.output());
                    if e.is_cancelled() {
                        Err(JobError::Killed)
                    } else {
                        Err(JobError::Failed(e.to_string()))
                    }
                }
            }
        })
    }
}

/// Writes a job line's output to the job chain by chain, joined the same
/// way the line's return value is, so `job logs` sees finished chains
/// while the job is still running.
struct JobOutput<'a> {
    handle: &'a JobHandle,
    /// Bytes of joined chain output written so far.
    written: AtomicUsize,
}

impl<'a> JobOutput<'a> {
    fn new(handle: &'a JobHandle) -> Self {
        Self {
            handle,
            written: AtomicUsize::new(0),
        }
    }

    fn push(&self, text: &str) {
        if text.is_empty() {
            return;
        }
        if self.written.load(Ordering::Acquire) > 0 {
            self.handle.append("\n");
            self.written.fetch_add(1, Ordering::AcqRel);
        }
        self.handle.append(text);
        self.written.fetch_add(text.len(), Ordering::AcqRel);
    }

    /// Write the part of a failed line's carried output that no finished
    /// chain reported. Carried output always starts with the finished
    /// chains' joined output.
    fn push_unreported(&self, carried: &str) {
        let written = self.written.load(Ordering::Acquire);
        let rest = carried.get(written..).unwrap_or_default();
        let rest = if written > 0 {
            rest.strip_prefix('\n').unwrap_or(rest)
        } else {
            rest
        };
        self.push(rest);
    }
}

/// Configures and builds an [`Engine`].
pub struct EngineBuilder {
    config: EngineConfig,
    builtins: bool,
    registry: Registry,
    expanders: Vec<Arc<dyn Expander>>,
    observer: Option<Arc<dyn ExecutionObserver>>,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            builtins: true,
            registry: Registry::new(),
            expanders: Vec::new(),
            observer: None,
        }
    }
}

impl EngineBuilder {
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    pub fn job_output_limit(mut self, bytes: usize) -> Self {
        self.config.job_output_limit = bytes;
        self
    }

    pub fn kill_grace(mut self, grace: Duration) -> Self {
        self.config.kill_grace = grace;
        self
    }

    pub fn shell(mut self, shell: impl Into<String>) -> Self {
        self.config.shell = shell.into();
        self
    }

    /// Register the builtin commands (default on).
    pub fn builtins(mut self, enabled: bool) -> Self {
        self.builtins = enabled;
        self
    }

    /// Register a command. Commands added here take precedence over
    /// builtins with the same name.
    pub fn command(mut self, spec: CommandSpec, command: impl Command) -> Self {
        self.registry.register(spec, command);
        self
    }

    /// Append a custom expander; expanders run in the order added.
    pub fn expander(mut self, expander: impl Expander) -> Self {
        self.expanders.push(Arc::new(expander));
        self
    }

    pub fn observer(mut self, observer: impl ExecutionObserver) -> Self {
        self.observer = Some(Arc::new(observer));
        self
    }

    pub fn build(self) -> Engine {
        let mut registry = Registry::new();
        if self.builtins {
            builtins::register(&mut registry);
        }
        registry.merge(self.registry);

        let jobs = JobManager::with_limits(self.config.job_output_limit, self.config.kill_grace);
        tracing::debug!(
            commands = registry.len(),
            max_depth = self.config.max_depth,
            "engine built"
        );
        Engine {
            inner: Arc::new(EngineInner {
                config: self.config,
                registry,
                aliases: AliasTable::new(),
                vars: VarStore::new(),
                expanders: self.expanders,
                jobs,
                observer: self.observer.unwrap_or_else(|| Arc::new(LogObserver)),
            }),
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
