// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Locates `$((expr))`, `$(cmd)`, `$NAME` and `${NAME}` inside a value.
//!
//! Scanning only finds the pieces; evaluating them (arithmetic, running
//! the command, reading the environment) is up to the caller.

/// A slice of a value: plain text or one `$` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Piece<'a> {
    Text(&'a str),
    /// Contents of `$(( ))`.
    Arith { expr: &'a str, raw: &'a str },
    /// Contents of `$( )`.
    Command { cmd: &'a str, raw: &'a str },
    /// `$NAME` or `${NAME}`.
    Env { name: &'a str, raw: &'a str },
}

impl<'a> Piece<'a> {
    /// The source text this piece was scanned from.
    pub fn raw(&self) -> &'a str {
        match self {
            Piece::Text(raw)
            | Piece::Arith { raw, .. }
            | Piece::Command { raw, .. }
            | Piece::Env { raw, .. } => raw,
        }
    }
}

/// Split `input` into text and `$` forms. Unterminated or malformed forms
/// stay in the surrounding text.
pub fn scan(input: &str) -> Vec<Piece<'_>> {
    let bytes = input.as_bytes();
    let mut pieces = Vec::new();
    let mut text_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'$' {
            i += 1;
            continue;
        }
        let found = match bytes.get(i + 1) {
            Some(b'(') => matching_close(input, i + 1).map(|close| {
                let inner = &input[i + 2..close];
                let raw = &input[i..=close];
                let piece = match arith_body(inner) {
                    Some(expr) => Piece::Arith { expr, raw },
                    None => Piece::Command { cmd: inner, raw },
                };
                (piece, close + 1)
            }),
            Some(b'{') => input[i + 2..].find('}').and_then(|off| {
                let name = &input[i + 2..i + 2 + off];
                let end = i + 3 + off;
                is_name(name).then(|| {
                    (
                        Piece::Env {
                            name,
                            raw: &input[i..end],
                        },
                        end,
                    )
                })
            }),
            Some(c) if c.is_ascii_alphabetic() || *c == b'_' => {
                let end = bytes[i + 1..]
                    .iter()
                    .position(|c| !(c.is_ascii_alphanumeric() || *c == b'_'))
                    .map_or(bytes.len(), |p| i + 1 + p);
                Some((
                    Piece::Env {
                        name: &input[i + 1..end],
                        raw: &input[i..end],
                    },
                    end,
                ))
            }
            _ => None,
        };

        match found {
            Some((piece, end)) => {
                if text_start < i {
                    pieces.push(Piece::Text(&input[text_start..i]));
                }
                pieces.push(piece);
                i = end;
                text_start = end;
            }
            None => i += 1,
        }
    }
    if text_start < input.len() {
        pieces.push(Piece::Text(&input[text_start..]));
    }
    pieces
}

/// True when `input` contains at least one `$` form.
pub fn has_substitutions(input: &str) -> bool {
    scan(input).iter().any(|p| !matches!(p, Piece::Text(_)))
}

fn is_name(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// `(expr)` as a single parenthesized group gives `expr`.
fn arith_body(inner: &str) -> Option<&str> {
    if !inner.starts_with('(') {
        return None;
    }
    let close = matching_close(inner, 0)?;
    (close == inner.len() - 1).then(|| &inner[1..close])
}

/// Index of the `)` closing the `(` at `open`, skipping quoted text.
fn matching_close(input: &str, open: usize) -> Option<usize> {
    let bytes = input.as_bytes();
    let mut depth = 0usize;
    let mut i = open;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            q @ (b'\'' | b'"') => {
                i += 1;
                while i < bytes.len() && bytes[i] != q {
                    i += 1;
                }
            }
            b'(' => depth += 1,
            b')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

#[cfg(test)]
#[path = "subst_tests.rs"]
mod tests;
