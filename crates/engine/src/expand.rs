// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Alias, variable and token expansion.
//!
//! Order of resolution:
//!
//! 1. whole-line alias (line equals an alias key)
//! 2. first-word alias (spliced in front of the rest of the line)
//! 3. global variables, textual replacement of every `@name` key
//! 4. call-scoped variables, same replacement
//! 5. custom expanders, in registration order
//! 6. tokens: `@env:NAME`, `@exec:cmd`, remaining bare `@name`
//! 7. value helpers `$((expr))`, `$(cmd)`, `$VAR` (only for `set` values)
//!
//! Steps 1-2 run once on the raw line before parsing. Steps 3-6 run on
//! each word after parsing. Anything that cannot be resolved stays as
//! written; only recursion overflow and cancellation escape as errors.

use crate::context::ExecContext;
use crate::engine::Engine;
use crate::error::EngineError;
use sk_core::{AliasTable, VarStore};
use sk_shell::arith;
use sk_shell::subst::{self, Piece};
use tokio_util::sync::CancellationToken;

/// Result of a custom expander.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpandOutcome {
    /// Hand the (possibly rewritten) text to the next step.
    Continue(String),
    /// Use this text as the final expansion; later steps are skipped.
    Terminal(String),
}

/// Pluggable expansion step, run after variable substitution.
pub trait Expander: Send + Sync + 'static {
    fn expand(&self, text: &str, scope: Option<&VarStore>) -> ExpandOutcome;
}

/// Apply whole-line and first-word aliases to `line`.
///
/// An exact match replaces the whole line and is not re-applied as a
/// first-word match. Expansions are not re-aliased.
pub fn resolve_aliases(aliases: &AliasTable, line: &str) -> String {
    if aliases.is_empty() {
        return line.to_string();
    }
    let trimmed = line.trim();
    if let Some(expansion) = aliases.get(trimmed) {
        tracing::trace!(alias = trimmed, "whole-line alias");
        return expansion;
    }
    let end = trimmed
        .find(|c: char| c.is_whitespace() || matches!(c, '|' | ';' | '>'))
        .unwrap_or(trimmed.len());
    let first = &trimmed[..end];
    if !first.is_empty() {
        if let Some(expansion) = aliases.get(first) {
            tracing::trace!(alias = first, "first-word alias");
            return format!("{}{}", expansion, &trimmed[end..]);
        }
    }
    line.to_string()
}

const EXEC_PREFIX: &str = "@exec:";
const ENV_PREFIX: &str = "@env:";

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn name_len(s: &str) -> usize {
    s.find(|c: char| !is_name_char(c)).unwrap_or(s.len())
}

impl Engine {
    /// Expand a line the way execution would, without running it: aliases,
    /// then variables and tokens. `@exec:` forms do run.
    pub async fn expand(&self, line: &str, scope: Option<&VarStore>) -> Result<String, EngineError> {
        let cx = ExecContext::new(CancellationToken::new());
        let aliased = resolve_aliases(self.aliases(), line);
        self.expand_text(&cx, &aliased, scope).await
    }

    /// Expand variables and tokens only. Aliases are never applied, so this
    /// is safe on a single argument.
    pub async fn expand_variables_only(
        &self,
        text: &str,
        scope: Option<&VarStore>,
    ) -> Result<String, EngineError> {
        let cx = ExecContext::new(CancellationToken::new());
        self.expand_text(&cx, text, scope).await
    }

    /// Steps 3-6 for one word.
    pub(crate) async fn expand_text(
        &self,
        cx: &ExecContext,
        text: &str,
        scope: Option<&VarStore>,
    ) -> Result<String, EngineError> {
        let mut text = self.vars().substitute(text);
        if let Some(scope) = scope {
            text = scope.substitute(&text);
        }
        for expander in self.expanders() {
            match expander.expand(&text, scope) {
                ExpandOutcome::Continue(next) => text = next,
                ExpandOutcome::Terminal(done) => return Ok(done),
            }
        }
        if !text.contains('@') {
            return Ok(text);
        }
        self.resolve_tokens(cx, &text, scope).await
    }

    /// Steps 3-7: a word followed by `$((..))`, `$(..)` and `$VAR` forms.
    pub(crate) async fn expand_value(
        &self,
        cx: &ExecContext,
        text: &str,
        scope: Option<&VarStore>,
    ) -> Result<String, EngineError> {
        let text = self.expand_text(cx, text, scope).await?;
        let mut out = String::with_capacity(text.len());
        for piece in subst::scan(&text) {
            match piece {
                Piece::Text(t) => out.push_str(t),
                Piece::Arith { expr, .. } => {
                    let value = arith::eval(expr, &|name: &str| self.number_var(name, scope));
                    out.push_str(&value.to_string());
                }
                Piece::Command { cmd, raw } => match self.substitute_command(cx, cmd, scope).await? {
                    Some(output) => out.push_str(&output),
                    None => out.push_str(raw),
                },
                Piece::Env { name, raw } => match std::env::var(name) {
                    Ok(value) => out.push_str(&value),
                    Err(_) => out.push_str(raw),
                },
            }
        }
        Ok(out)
    }

    /// Resolve `@env:`, `@exec:` and bare `@name` tokens left to right.
    /// `@exec:` takes the rest of the word as its command.
    async fn resolve_tokens(
        &self,
        cx: &ExecContext,
        text: &str,
        scope: Option<&VarStore>,
    ) -> Result<String, EngineError> {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(at) = rest.find('@') {
            out.push_str(&rest[..at]);
            let tail = &rest[at..];

            if let Some(cmd) = tail.strip_prefix(EXEC_PREFIX) {
                match self.substitute_command(cx, cmd, scope).await? {
                    Some(output) => out.push_str(&output),
                    None => out.push_str(tail),
                }
                return Ok(out);
            }

            if let Some(after) = tail.strip_prefix(ENV_PREFIX) {
                let len = name_len(after);
                if len > 0 {
                    let name = &after[..len];
                    match std::env::var(name) {
                        Ok(value) => out.push_str(&value),
                        Err(_) => out.push_str(&tail[..ENV_PREFIX.len() + len]),
                    }
                    rest = &after[len..];
                    continue;
                }
            }

            let len = name_len(&tail[1..]);
            let token = &tail[..1 + len];
            match self.lookup_var(token, scope).filter(|_| len > 0) {
                Some(value) => out.push_str(&value),
                None => out.push_str(token),
            }
            rest = &tail[1 + len..];
        }
        out.push_str(rest);
        Ok(out)
    }

    /// Run `cmd` as a nested call for `@exec:` or `$(..)`.
    ///
    /// `Ok(None)` means the command failed in an ordinary way and the
    /// token should stay as written.
    async fn substitute_command(
        &self,
        cx: &ExecContext,
        cmd: &str,
        scope: Option<&VarStore>,
    ) -> Result<Option<String>, EngineError> {
        match self.run_line(cx, cmd, scope).await {
            Ok(output) => Ok(Some(output.trim_end().to_string())),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                tracing::debug!(command = cmd, error = %e, "substitution left unresolved");
                Ok(None)
            }
        }
    }

    fn lookup_var(&self, key: &str, scope: Option<&VarStore>) -> Option<String> {
        scope
            .and_then(|s| s.get(key))
            .or_else(|| self.vars().get(key))
    }

    fn number_var(&self, name: &str, scope: Option<&VarStore>) -> Option<i64> {
        let key = if name.starts_with('@') {
            name.to_string()
        } else {
            format!("@{name}")
        };
        self.lookup_var(&key, scope)
            .and_then(|v| v.trim().parse().ok())
    }
}

#[cfg(test)]
#[path = "expand_tests.rs"]
mod tests;
