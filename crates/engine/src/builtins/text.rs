// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `print` and `grep`

use crate::error::CommandError;
use crate::registry::{Command, CommandSpec, Invocation, Output, Registry};
use async_trait::async_trait;

pub(super) fn register(registry: &mut Registry) {
    registry.register(
        CommandSpec::new("print", "print arguments, or echo stdin"),
        Print,
    );
    registry.register(
        CommandSpec::new("grep", "grep [-v] [-i] <pattern>: filter stdin lines"),
        Grep,
    );
}

struct Print;

#[async_trait]
impl Command for Print {
    async fn run(&self, inv: Invocation) -> Result<Output, CommandError> {
        if inv.args.is_empty() {
            return Ok(Output::text(inv.stdin()));
        }
        Ok(Output::text(unescape(&inv.args.join(" "))))
    }
}

/// Interpret `\n`, `\t` and `\\`; other backslashes stay.
pub(crate) fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

struct Grep;

const GREP_USAGE: &str = "grep [-v] [-i] <pattern>";

#[async_trait]
impl Command for Grep {
    async fn run(&self, inv: Invocation) -> Result<Output, CommandError> {
        let mut invert = false;
        let mut ignore_case = false;
        let mut rest = inv.args.iter().map(String::as_str).peekable();

        while let Some(flag) = rest.peek().copied() {
            if flag == "--" {
                rest.next();
                break;
            }
            let Some(letters) = flag.strip_prefix('-').filter(|l| !l.is_empty()) else {
                break;
            };
            for letter in letters.chars() {
                match letter {
                    'v' => invert = true,
                    'i' => ignore_case = true,
                    _ => return Err(CommandError::usage(GREP_USAGE)),
                }
            }
            rest.next();
        }

        let pattern: Vec<&str> = rest.collect();
        if pattern.is_empty() {
            return Err(CommandError::usage(GREP_USAGE));
        }
        let mut pattern = pattern.join(" ");
        if ignore_case {
            pattern = pattern.to_lowercase();
        }

        let matched: Vec<&str> = inv
            .stdin()
            .lines()
            .filter(|line| {
                let hit = if ignore_case {
                    line.to_lowercase().contains(&pattern)
                } else {
                    line.contains(&pattern)
                };
                hit != invert
            })
            .collect();
        Ok(Output::text(matched.join("\n")))
    }
}
