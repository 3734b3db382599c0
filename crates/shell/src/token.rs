// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lexer output.

use crate::span::Span;
use std::fmt;

/// Kinds of token in a command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// A word with quotes removed and escapes resolved.
    Word(String),
    /// `|`
    Pipe,
    /// `;`
    Semi,
    /// `>` (or `>>` when `append`)
    Redirect { append: bool },
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Word(w) => write!(f, "word {:?}", w),
            TokenKind::Pipe => write!(f, "'|'"),
            TokenKind::Semi => write!(f, "';'"),
            TokenKind::Redirect { append: false } => write!(f, "'>'"),
            TokenKind::Redirect { append: true } => write!(f, "'>>'"),
        }
    }
}

/// A token with its source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}
