// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Byte ranges into a command line, and caret diagnostics built from them.

use serde::{Deserialize, Serialize};

/// A half-open byte range `start..end` into the parsed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start must not exceed end");
        Self { start, end }
    }

    /// Zero-width span at `pos`.
    #[inline]
    pub fn at(pos: usize) -> Self {
        Self::new(pos, pos)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Smallest span covering both.
    #[inline]
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// The spanned text, or `""` when out of bounds.
    #[inline]
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.start..self.end).unwrap_or("")
    }
}

/// The line with a caret row underneath the span.
///
/// ```text
/// print a | | grep b
///           ^
/// ```
///
/// Columns count characters, not bytes, so multi-byte input lines up.
pub fn caret_snippet(line: &str, span: Span) -> String {
    let start = span.start.min(line.len());
    let end = span.end.clamp(start, line.len());
    let col = line.get(..start).map(|s| s.chars().count()).unwrap_or(0);
    let width = line
        .get(start..end)
        .map(|s| s.chars().count())
        .unwrap_or(0)
        .max(1);
    format!("{}\n{}{}", line, " ".repeat(col), "^".repeat(width))
}

/// A labelled diagnostic: message, column, and the caret snippet.
///
/// ```text
/// error: missing command after '|' (column 9)
///   | print a |
///   |         ^
/// ```
pub fn diagnostic(line: &str, span: Span, message: &str) -> String {
    let snippet = caret_snippet(line, span);
    let col = line
        .get(..span.start.min(line.len()))
        .map(|s| s.chars().count())
        .unwrap_or(0);
    let mut out = format!("error: {} (column {})", message, col + 1);
    for row in snippet.lines() {
        out.push_str("\n  | ");
        out.push_str(row);
    }
    out
}

#[cfg(test)]
#[path = "span_tests.rs"]
mod tests;
