// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Integer arithmetic for `$((expr))`.
//!
//! Supports `+ - * / %`, unary `+`/`-` and parentheses over `i64`.
//! Operators of equal precedence associate left to right. Identifiers
//! (`x`, `@x`) are resolved through a caller-supplied lookup; unknown
//! names count as 0.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArithError {
    #[error("unexpected {found:?} at offset {offset}")]
    Unexpected { found: String, offset: usize },
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("division by zero")]
    DivisionByZero,
    #[error("integer overflow")]
    Overflow,
}

/// Evaluate `expr`, degrading to 0 on any error.
pub fn eval(expr: &str, lookup: &dyn Fn(&str) -> Option<i64>) -> i64 {
    try_eval(expr, lookup).unwrap_or(0)
}

/// Evaluate `expr`, reporting why it could not be computed.
pub fn try_eval(expr: &str, lookup: &dyn Fn(&str) -> Option<i64>) -> Result<i64, ArithError> {
    let mut p = ArithParser {
        src: expr,
        pos: 0,
        lookup,
    };
    let value = p.expr()?;
    p.skip_ws();
    match p.peek() {
        None => Ok(value),
        Some(c) => Err(ArithError::Unexpected {
            found: c.to_string(),
            offset: p.pos,
        }),
    }
}

struct ArithParser<'a> {
    src: &'a str,
    pos: usize,
    lookup: &'a dyn Fn(&str) -> Option<i64>,
}

impl ArithParser<'_> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek().filter(|c| c.is_whitespace()) {
            self.pos += c.len_utf8();
        }
    }

    /// Consume one of `ops` if it is the next non-space character.
    fn op(&mut self, ops: &[char]) -> Option<char> {
        self.skip_ws();
        let c = self.peek().filter(|c| ops.contains(c))?;
        self.pos += 1;
        Some(c)
    }

    fn expr(&mut self) -> Result<i64, ArithError> {
        let mut acc = self.term()?;
        while let Some(op) = self.op(&['+', '-']) {
            let rhs = self.term()?;
            acc = match op {
                '+' => acc.checked_add(rhs),
                _ => acc.checked_sub(rhs),
            }
            .ok_or(ArithError::Overflow)?;
        }
        Ok(acc)
    }

    fn term(&mut self) -> Result<i64, ArithError> {
        let mut acc = self.unary()?;
        while let Some(op) = self.op(&['*', '/', '%']) {
            let rhs = self.unary()?;
            if op != '*' && rhs == 0 {
                return Err(ArithError::DivisionByZero);
            }
            acc = match op {
                '*' => acc.checked_mul(rhs),
                '/' => acc.checked_div(rhs),
                _ => acc.checked_rem(rhs),
            }
            .ok_or(ArithError::Overflow)?;
        }
        Ok(acc)
    }

    fn unary(&mut self) -> Result<i64, ArithError> {
        match self.op(&['-', '+']) {
            Some('-') => self.unary()?.checked_neg().ok_or(ArithError::Overflow),
            Some(_) => self.unary(),
            None => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<i64, ArithError> {
        self.skip_ws();
        let start = self.pos;
        let c = self.peek().ok_or(ArithError::UnexpectedEnd)?;

        if c == '(' {
            self.pos += 1;
            let value = self.expr()?;
            return match self.op(&[')']) {
                Some(_) => Ok(value),
                None => match self.peek() {
                    Some(c) => Err(ArithError::Unexpected {
                        found: c.to_string(),
                        offset: self.pos,
                    }),
                    None => Err(ArithError::UnexpectedEnd),
                },
            };
        }

        if c.is_ascii_digit() {
            let digits = self.take_while(|c| c.is_ascii_digit());
            return digits.parse().map_err(|_| ArithError::Overflow);
        }

        if c == '@' || c == '_' || c.is_ascii_alphabetic() {
            self.pos += c.len_utf8();
            self.take_while(|c| c == '_' || c.is_ascii_alphanumeric());
            let name = &self.src[start..self.pos];
            return Ok((self.lookup)(name).unwrap_or(0));
        }

        Err(ArithError::Unexpected {
            found: c.to_string(),
            offset: start,
        })
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &str {
        let start = self.pos;
        while let Some(c) = self.peek().filter(|c| pred(*c)) {
            self.pos += c.len_utf8();
        }
        &self.src[start..self.pos]
    }
}

#[cfg(test)]
#[path = "arith_tests.rs"]
mod tests;
