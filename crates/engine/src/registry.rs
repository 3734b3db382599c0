// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command registry: fully qualified names mapped to handlers.
//!
//! Names may span several words (`job list`). Lookup takes the words of a
//! stage and picks the longest registered prefix, so `job list` wins over
//! a bare `job` when both exist.

use crate::context::ExecContext;
use crate::engine::Engine;
use crate::error::{CommandError, EngineError};
use async_trait::async_trait;
use sk_core::VarStore;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Registration metadata for a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Fully qualified name, words separated by single spaces.
    pub name: String,
    /// One-line description shown by `help`.
    pub summary: String,
    /// Pass arguments through without variable or token expansion.
    pub raw_args: bool,
}

impl CommandSpec {
    pub fn new(name: impl AsRef<str>, summary: impl Into<String>) -> Self {
        Self {
            name: normalize(name.as_ref()),
            summary: summary.into(),
            raw_args: false,
        }
    }

    pub fn raw_args(mut self) -> Self {
        self.raw_args = true;
        self
    }

    fn word_count(&self) -> usize {
        self.name.split(' ').count()
    }
}

/// What a command printed. Both channels end up merged into the stage
/// output; they are kept apart only until then.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Output {
    pub stdout: String,
    pub stderr: String,
}

impl Output {
    pub fn text(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// stdout then stderr, without trailing newlines.
    pub fn merged(self) -> String {
        let stdout = self.stdout.trim_end_matches('\n');
        let stderr = self.stderr.trim_end_matches('\n');
        crate::error::join_output(stdout, stderr)
    }
}

/// Everything a command receives for one invocation.
pub struct Invocation {
    /// Handle to the running engine, for nested calls and shared state.
    pub engine: Engine,
    /// Registered name that matched.
    pub name: String,
    /// Arguments after the matched name.
    pub args: Vec<String>,
    /// Output of the previous pipeline stage.
    pub stdin: Option<String>,
    /// Call-scoped variables passed to the top-level execute.
    pub scope: Option<VarStore>,
    pub cx: ExecContext,
}

impl Invocation {
    pub fn stdin(&self) -> &str {
        self.stdin.as_deref().unwrap_or("")
    }

    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    /// Argument at `index`, or a usage error.
    pub fn require(&self, index: usize, usage: &str) -> Result<&str, CommandError> {
        self.arg(index).ok_or_else(|| CommandError::usage(usage))
    }

    /// Run `line` as a nested call sharing this invocation's depth counter
    /// and cancellation.
    pub async fn execute_nested(&self, line: &str) -> Result<String, EngineError> {
        self.engine
            .run_line(&self.cx, line, self.scope.as_ref())
            .await
    }
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("name", &self.name)
            .field("args", &self.args)
            .field("stdin", &self.stdin.as_ref().map(String::len))
            .field("depth", &self.cx.depth())
            .finish()
    }
}

/// A command implementation.
#[async_trait]
pub trait Command: Send + Sync + 'static {
    async fn run(&self, inv: Invocation) -> Result<Output, CommandError>;
}

/// Adapter turning a synchronous closure into a [`Command`].
pub struct FnCommand<F>(F);

/// Wrap a closure as a command.
pub fn command_fn<F>(f: F) -> FnCommand<F>
where
    F: Fn(Invocation) -> Result<Output, CommandError> + Send + Sync + 'static,
{
    FnCommand(f)
}

#[async_trait]
impl<F> Command for FnCommand<F>
where
    F: Fn(Invocation) -> Result<Output, CommandError> + Send + Sync + 'static,
{
    async fn run(&self, inv: Invocation) -> Result<Output, CommandError> {
        (self.0)(inv)
    }
}

#[derive(Clone)]
pub(crate) struct Registered {
    pub(crate) spec: CommandSpec,
    pub(crate) handler: Arc<dyn Command>,
}

/// Name → handler table, filled at configuration time.
#[derive(Clone, Default)]
pub struct Registry {
    commands: BTreeMap<String, Registered>,
    max_words: usize,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.commands.keys()).finish()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a command, replacing any earlier one with the same name.
    pub fn register(&mut self, spec: CommandSpec, command: impl Command) {
        self.max_words = self.max_words.max(spec.word_count());
        let name = spec.name.clone();
        let previous = self.commands.insert(
            name.clone(),
            Registered {
                spec,
                handler: Arc::new(command),
            },
        );
        if previous.is_some() {
            tracing::debug!(command = name.as_str(), "replaced registered command");
        }
    }

    /// Move every command of `other` in, replacing same-named ones.
    pub(crate) fn merge(&mut self, other: Registry) {
        self.max_words = self.max_words.max(other.max_words);
        self.commands.extend(other.commands);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(&normalize(name))
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Registered specs in name order.
    pub fn specs(&self) -> impl Iterator<Item = &CommandSpec> {
        self.commands.values().map(|r| &r.spec)
    }

    /// Longest registered prefix of `words`, with how many words it used.
    pub(crate) fn resolve(&self, words: &[String]) -> Option<(&Registered, usize)> {
        let longest = words.len().min(self.max_words);
        (1..=longest).rev().find_map(|n| {
            let key = words[..n].join(" ");
            self.commands.get(&key).map(|r| (r, n))
        })
    }

    /// Spec lookup by exact name.
    pub fn spec(&self, name: &str) -> Option<&CommandSpec> {
        self.commands.get(&normalize(name)).map(|r| &r.spec)
    }
}

fn normalize(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
