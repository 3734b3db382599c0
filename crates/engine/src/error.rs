// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for line execution and command dispatch

use sk_core::JobError;
use sk_shell::ParseError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors returned from [`Engine::execute`](crate::Engine::execute).
///
/// Variants that can interrupt a line part-way carry the output produced
/// before the interruption; see [`EngineError::output`].
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("syntax error: {0}")]
    Syntax(#[from] ParseError),

    #[error("maximum execution depth exceeded ({max}): possible recursion")]
    RecursionExceeded { max: usize },

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("{command}: {source}")]
    Dispatch {
        command: String,
        #[source]
        source: CommandError,
        output: String,
    },

    #[error("cancelled")]
    Cancelled { output: String },

    #[error("cannot write {}: {source}", path.display())]
    Redirect {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl EngineError {
    /// Output accumulated before the failure, if any.
    pub fn output(&self) -> &str {
        match self {
            EngineError::Dispatch { output, .. } | EngineError::Cancelled { output } => output,
            _ => "",
        }
    }

    /// True when the call was aborted on request rather than failing.
    pub fn is_cancelled(&self) -> bool {
        match self {
            EngineError::Cancelled { .. } => true,
            EngineError::Dispatch { source, .. } => source.is_cancelled(),
            _ => false,
        }
    }

    /// True when the recursion ceiling was hit here or in a nested call.
    pub fn is_recursion(&self) -> bool {
        match self {
            EngineError::RecursionExceeded { .. } => true,
            EngineError::Dispatch {
                source: CommandError::Engine(inner),
                ..
            } => inner.is_recursion(),
            _ => false,
        }
    }

    /// Errors that must escape token expansion instead of leaving the token
    /// in place.
    pub(crate) fn is_fatal(&self) -> bool {
        self.is_cancelled() || self.is_recursion()
    }

    /// Put `earlier` in front of the carried output.
    pub(crate) fn with_earlier_output(mut self, earlier: &str) -> Self {
        if earlier.is_empty() {
            return self;
        }
        if let EngineError::Dispatch { output, .. } | EngineError::Cancelled { output } = &mut self
        {
            *output = join_output(earlier, output);
        }
        self
    }
}

/// Errors raised by a command implementation.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Bad arguments; the message is the usage line.
    #[error("usage: {0}")]
    Usage(String),

    #[error("{0}")]
    Failed(String),

    /// An OS process exited unsuccessfully. `output` is what it printed.
    #[error("exited with status {status}")]
    Exit { status: i32, output: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Job(#[from] JobError),

    /// A nested engine call made by the command failed.
    #[error(transparent)]
    Engine(Box<EngineError>),

    #[error("cancelled")]
    Cancelled,
}

impl CommandError {
    pub fn usage(text: impl Into<String>) -> Self {
        CommandError::Usage(text.into())
    }

    pub fn failed(text: impl Into<String>) -> Self {
        CommandError::Failed(text.into())
    }

    pub fn is_cancelled(&self) -> bool {
        match self {
            CommandError::Cancelled => true,
            CommandError::Engine(inner) => inner.is_cancelled(),
            _ => false,
        }
    }

    /// Output the command produced before failing.
    pub fn partial_output(&self) -> &str {
        match self {
            CommandError::Exit { output, .. } => output,
            CommandError::Engine(inner) => inner.output(),
            _ => "",
        }
    }
}

impl From<EngineError> for CommandError {
    fn from(e: EngineError) -> Self {
        CommandError::Engine(Box::new(e))
    }
}

/// Join two output fragments with a newline, skipping empty ones.
pub(crate) fn join_output(a: &str, b: &str) -> String {
    match (a.is_empty(), b.is_empty()) {
        (true, _) => b.to_string(),
        (_, true) => a.to_string(),
        _ => format!("{a}\n{b}"),
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
