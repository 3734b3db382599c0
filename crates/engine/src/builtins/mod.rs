// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Builtin commands, registered through the same contract as host commands.

mod jobs;
mod process;
mod text;
mod vars;

use crate::error::CommandError;
use crate::registry::{Command, CommandSpec, Invocation, Output, Registry};
use async_trait::async_trait;
use sk_shell::quote_join;

pub(crate) fn register(registry: &mut Registry) {
    text::register(registry);
    vars::register(registry);
    jobs::register(registry);
    process::register(registry);
    registry.register(CommandSpec::new("help", "list commands"), Help);
}

/// Turn arguments back into one command line: a single argument is used
/// as written (so `bg 'a | b'` keeps its pipe), several are re-quoted.
pub(crate) fn command_line(args: &[String]) -> Option<String> {
    match args {
        [] => None,
        [one] => Some(one.clone()).filter(|s| !s.trim().is_empty()),
        many => Some(quote_join(many)),
    }
}

struct Help;

#[async_trait]
impl Command for Help {
    async fn run(&self, inv: Invocation) -> Result<Output, CommandError> {
        let specs: Vec<_> = inv.engine.registry().specs().cloned().collect();
        let width = specs.iter().map(|s| s.name.len()).max().unwrap_or(0);
        let lines: Vec<String> = specs
            .iter()
            .map(|s| format!("{:<width$}  {}", s.name, s.summary))
            .collect();
        Ok(Output::text(lines.join("\n")))
    }
}

#[cfg(test)]
#[path = "../builtins_tests/mod.rs"]
mod tests;
