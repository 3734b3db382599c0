// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-call execution state: cancellation and the recursion counter.

use crate::error::EngineError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// State shared by a top-level call and every call nested inside it.
///
/// Cloning shares the depth counter and the token. A new top-level call
/// gets a fresh context, so unrelated calls never eat into each other's
/// depth budget. A background job started from inside a call gets its own
/// counter seeded with the launcher's depth.
#[derive(Debug, Clone)]
pub struct ExecContext {
    depth: Arc<AtomicUsize>,
    cancel: CancellationToken,
}

impl ExecContext {
    pub fn new(cancel: CancellationToken) -> Self {
        Self::with_base_depth(cancel, 0)
    }

    /// Context whose calls start counting from `base` instead of 0.
    pub fn with_base_depth(cancel: CancellationToken, base: usize) -> Self {
        Self {
            depth: Arc::new(AtomicUsize::new(base)),
            cancel,
        }
    }

    /// Current nesting depth (0 outside any call).
    pub fn depth(&self) -> usize {
        self.depth.load(Ordering::Acquire)
    }

    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Enter one level of nesting.
    ///
    /// The counter is incremented before the ceiling check and the returned
    /// guard (or the error path) always gives the level back.
    pub fn enter(&self, max: usize) -> Result<DepthGuard, EngineError> {
        let guard = DepthGuard {
            depth: Arc::clone(&self.depth),
            level: self.depth.fetch_add(1, Ordering::AcqRel) + 1,
        };
        if guard.level > max {
            tracing::warn!(depth = guard.level, max, "maximum execution depth exceeded");
            return Err(EngineError::RecursionExceeded { max });
        }
        Ok(guard)
    }
}

/// Holds one level of nesting; released on drop.
#[derive(Debug)]
pub struct DepthGuard {
    depth: Arc<AtomicUsize>,
    level: usize,
}

impl DepthGuard {
    /// Depth of the call holding this guard (1 for a top-level call).
    pub fn level(&self) -> usize {
        self.level
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        self.depth.fetch_sub(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
