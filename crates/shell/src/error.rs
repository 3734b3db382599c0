// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lexer errors.

use crate::span::Span;
use thiserror::Error;

/// Errors raised while splitting a line into tokens.
///
/// Each error's span starts at the construct that was left open and runs
/// to the end of the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexerError {
    #[error("unterminated single quote at position {}", span.start)]
    UnterminatedSingleQuote { span: Span },

    #[error("unterminated double quote at position {}", span.start)]
    UnterminatedDoubleQuote { span: Span },

    /// `$(`, `$((` or `${` without its closing delimiter.
    #[error("unterminated '{open}' at position {}", span.start)]
    UnterminatedGroup { open: &'static str, span: Span },

    #[error("trailing backslash at position {}", span.start)]
    TrailingEscape { span: Span },
}

impl LexerError {
    pub fn span(&self) -> Span {
        match self {
            LexerError::UnterminatedSingleQuote { span }
            | LexerError::UnterminatedDoubleQuote { span }
            | LexerError::UnterminatedGroup { span, .. }
            | LexerError::TrailingEscape { span } => *span,
        }
    }
}
