// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Variable and alias commands.
//!
//! `set`, `unset`, `alias` and `unalias` take their arguments raw so a
//! name being assigned is never replaced by its current value.

use crate::error::CommandError;
use crate::registry::{Command, CommandSpec, Invocation, Output, Registry};
use async_trait::async_trait;

pub(super) fn register(registry: &mut Registry) {
    registry.register(
        CommandSpec::new("set", "set @name <value...>: assign a global variable").raw_args(),
        Set,
    );
    registry.register(
        CommandSpec::new("unset", "unset @name: remove a global variable").raw_args(),
        Unset,
    );
    registry.register(CommandSpec::new("vars", "list global variables"), Vars);
    registry.register(
        CommandSpec::new("alias", "alias [name=expansion]: define or show aliases").raw_args(),
        Alias,
    );
    registry.register(
        CommandSpec::new("unalias", "unalias <name>: remove an alias").raw_args(),
        Unalias,
    );
    registry.register(CommandSpec::new("aliases", "list aliases"), Aliases);
}

/// Variables are keyed by their reference form; `x` and `@x` name the same one.
fn var_key(name: &str) -> String {
    if name.starts_with('@') {
        name.to_string()
    } else {
        format!("@{name}")
    }
}

fn listing(entries: Vec<(String, String)>) -> Output {
    let lines: Vec<String> = entries.into_iter().map(|(k, v)| format!("{k}={v}")).collect();
    Output::text(lines.join("\n"))
}

struct Set;

const SET_USAGE: &str = "set @name <value...>";

#[async_trait]
impl Command for Set {
    async fn run(&self, inv: Invocation) -> Result<Output, CommandError> {
        let [name, value @ ..] = inv.args.as_slice() else {
            return Err(CommandError::usage(SET_USAGE));
        };
        if value.is_empty() || name.trim_start_matches('@').is_empty() {
            return Err(CommandError::usage(SET_USAGE));
        }
        let key = var_key(name);
        let raw = value.join(" ");
        let expanded = inv
            .engine
            .expand_value(&inv.cx, &raw, inv.scope.as_ref())
            .await?;
        tracing::debug!(var = key.as_str(), "set variable");
        inv.engine.vars().set(key, expanded);
        Ok(Output::empty())
    }
}

struct Unset;

#[async_trait]
impl Command for Unset {
    async fn run(&self, inv: Invocation) -> Result<Output, CommandError> {
        if inv.args.is_empty() {
            return Err(CommandError::usage("unset @name..."));
        }
        for name in &inv.args {
            let key = var_key(name);
            if inv.engine.vars().remove(&key).is_none() {
                return Err(CommandError::failed(format!("no such variable: {key}")));
            }
        }
        Ok(Output::empty())
    }
}

struct Vars;

#[async_trait]
impl Command for Vars {
    async fn run(&self, inv: Invocation) -> Result<Output, CommandError> {
        Ok(listing(inv.engine.vars().entries()))
    }
}

struct Alias;

#[async_trait]
impl Command for Alias {
    async fn run(&self, inv: Invocation) -> Result<Output, CommandError> {
        if inv.args.is_empty() {
            return Ok(listing(inv.engine.aliases().entries()));
        }
        let definition = inv.args.join(" ");
        let Some((name, expansion)) = definition.split_once('=') else {
            let name = definition.trim();
            return match inv.engine.aliases().get(name) {
                Some(expansion) => Ok(Output::text(format!("{name}={expansion}"))),
                None => Err(CommandError::failed(format!("no such alias: {name}"))),
            };
        };
        let (name, expansion) = (name.trim(), expansion.trim());
        if name.is_empty() || expansion.is_empty() {
            return Err(CommandError::usage("alias <name>=<expansion>"));
        }
        tracing::debug!(alias = name, "set alias");
        inv.engine.aliases().set(name, expansion);
        Ok(Output::empty())
    }
}

struct Unalias;

#[async_trait]
impl Command for Unalias {
    async fn run(&self, inv: Invocation) -> Result<Output, CommandError> {
        let name = inv.args.join(" ");
        let name = name.trim();
        if name.is_empty() {
            return Err(CommandError::usage("unalias <name>"));
        }
        match inv.engine.aliases().remove(name) {
            Some(_) => Ok(Output::empty()),
            None => Err(CommandError::failed(format!("no such alias: {name}"))),
        }
    }
}

struct Aliases;

#[async_trait]
impl Command for Aliases {
    async fn run(&self, inv: Invocation) -> Result<Output, CommandError> {
        Ok(listing(inv.engine.aliases().entries()))
    }
}
