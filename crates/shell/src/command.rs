// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parsed command structures.
//!
//! ```text
//! print a | grep a > out.txt ; vars
//! └──────── chain 0 ────────┘   └ chain 1
//!   stage 0   stage 1  redirect
//! ```

use crate::span::Span;

/// A whole input line: one or more chains separated by `;`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedLine {
    pub chains: Vec<Chain>,
}

impl ParsedLine {
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}

/// A pipeline with an optional output redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    pub head: ParsedCommand,
    pub redirect: Option<Redirect>,
    pub span: Span,
}

impl Chain {
    pub fn stages(&self) -> Stages<'_> {
        self.head.stages()
    }
}

/// `> target` or `>> target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub target: String,
    pub append: bool,
    pub span: Span,
}

/// One pipeline stage, linked to the stage its output feeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub name: String,
    pub args: Vec<String>,
    pub next: Option<Box<ParsedCommand>>,
    pub span: Span,
}

impl ParsedCommand {
    pub fn new(name: impl Into<String>, args: Vec<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            args,
            next: None,
            span,
        }
    }

    /// This stage followed by every downstream stage.
    pub fn stages(&self) -> Stages<'_> {
        Stages { cur: Some(self) }
    }

    /// Number of stages in the pipeline starting here.
    pub fn len(&self) -> usize {
        self.stages().count()
    }

    /// Always false; a command has at least itself.
    pub fn is_empty(&self) -> bool {
        false
    }
}

pub struct Stages<'a> {
    cur: Option<&'a ParsedCommand>,
}

impl<'a> Iterator for Stages<'a> {
    type Item = &'a ParsedCommand;

    fn next(&mut self) -> Option<Self::Item> {
        let cur = self.cur?;
        self.cur = cur.next.as_deref();
        Some(cur)
    }
}
