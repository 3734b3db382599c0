// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Lexer and parser for the `sk` command line language.
//!
//! ```ignore
//! use sk_shell::Parser;
//!
//! let line = Parser::parse("print 'a | b' | grep a > out.txt; vars")?;
//! assert_eq!(line.chains.len(), 2);
//! # Ok::<(), sk_shell::ParseError>(())
//! ```
//!
//! # Structure
//!
//! ```text
//! ParsedLine
//! └── Chain[]            split on ';'
//!     ├── head: ParsedCommand ──next──> ParsedCommand ...   split on '|'
//!     └── redirect: Option<Redirect>                         '>' / '>>'
//! ```
//!
//! Words come out of the lexer with quotes removed. `@name`, `@env:`,
//! `@exec:` and `$` forms are left untouched for the engine to expand;
//! [`subst::scan`] and [`arith`] help it do so.

pub mod arith;
mod command;
mod error;
mod lexer;
mod parse_error;
mod parser;
mod quote;
mod span;
pub mod subst;
mod token;

pub use command::{Chain, ParsedCommand, ParsedLine, Redirect, Stages};
pub use error::LexerError;
pub use lexer::Lexer;
pub use parse_error::ParseError;
pub use parser::Parser;
pub use quote::{quote, quote_join};
pub use span::{caret_snippet, diagnostic, Span};
pub use token::{Token, TokenKind};
