// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parser error types.

use crate::error::LexerError;
use crate::span::{caret_snippet, diagnostic, Span};
use crate::token::TokenKind;
use thiserror::Error;

/// Parser errors.
///
/// Every variant carries a span, so [`ParseError::context`] can always
/// point at the offending input.
///
/// ```ignore
/// use sk_shell::{Parser, ParseError};
///
/// let result = Parser::parse("print a |");
/// assert!(matches!(result, Err(ParseError::MissingOperand { operator: "|", .. })));
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("lexer error: {0}")]
    Lexer(#[from] LexerError),

    /// An operator with no command on one side: `| grep x`, `a ; ; b`.
    #[error("missing command around '{operator}' at position {}", span.start)]
    MissingOperand { operator: &'static str, span: Span },

    /// `>` or `>>` with no file name after it.
    #[error("missing file name after '{operator}' at position {}", span.start)]
    MissingRedirectTarget { operator: &'static str, span: Span },

    #[error("unexpected {found} at position {}, expected {expected}", span.start)]
    UnexpectedToken {
        found: TokenKind,
        expected: &'static str,
        span: Span,
    },
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            ParseError::Lexer(e) => e.span(),
            ParseError::MissingOperand { span, .. }
            | ParseError::MissingRedirectTarget { span, .. }
            | ParseError::UnexpectedToken { span, .. } => *span,
        }
    }

    /// The input line with a caret under the error location.
    pub fn context(&self, input: &str) -> String {
        caret_snippet(input, self.span())
    }

    /// Message, column and caret snippet in one block.
    pub fn diagnostic(&self, input: &str) -> String {
        diagnostic(input, self.span(), &self.to_string())
    }
}
