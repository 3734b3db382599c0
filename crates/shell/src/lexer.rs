// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Quote-aware tokenizer.
//!
//! Splits a line into words and the three operators `|`, `;` and `>`/`>>`.
//! Quoting rules:
//!
//! - `'...'` is literal.
//! - `"..."` is literal except `\"` and `\\`; other backslash sequences
//!   (such as `\n`) are kept as written for the verb to interpret.
//! - Outside quotes, `\x` yields `x`.
//! - `$(...)`, `$((...))` and `${...}` are copied verbatim as part of the
//!   word, nesting-aware, so operators inside them never split the line.
//! - Adjacent quoted and unquoted pieces join into one word (`a"b c"d`).
//! - A `#` that begins a token starts a comment running to end of line.

use crate::error::LexerError;
use crate::span::Span;
use crate::token::{Token, TokenKind};

pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// Tokenize a whole line.
    pub fn tokenize(input: &'a str) -> Result<Vec<Token>, LexerError> {
        let mut lexer = Lexer { input, pos: 0 };
        let mut tokens = Vec::new();
        while let Some(token) = lexer.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    #[inline]
    fn peek_second(&self) -> Option<char> {
        self.input[self.pos..].chars().nth(1)
    }

    #[inline]
    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn rest_span(&self, start: usize) -> Span {
        Span::new(start, self.input.len())
    }

    fn next_token(&mut self) -> Result<Option<Token>, LexerError> {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
        let start = self.pos;
        let Some(c) = self.peek() else {
            return Ok(None);
        };

        let kind = match c {
            '|' => {
                self.bump();
                TokenKind::Pipe
            }
            ';' => {
                self.bump();
                TokenKind::Semi
            }
            '>' => {
                self.bump();
                TokenKind::Redirect {
                    append: self.eat('>'),
                }
            }
            '#' => {
                self.pos = self.input.len();
                return Ok(None);
            }
            _ => TokenKind::Word(self.word()?),
        };
        Ok(Some(Token::new(kind, Span::new(start, self.pos))))
    }

    fn word(&mut self) -> Result<String, LexerError> {
        let mut buf = String::new();
        while let Some(c) = self.peek() {
            match c {
                c if c.is_whitespace() => break,
                '|' | ';' | '>' => break,
                '\'' => self.single_quoted(&mut buf)?,
                '"' => self.double_quoted(&mut buf)?,
                '\\' => {
                    let start = self.pos;
                    self.bump();
                    match self.bump() {
                        Some(next) => buf.push(next),
                        None => {
                            return Err(LexerError::TrailingEscape {
                                span: self.rest_span(start),
                            })
                        }
                    }
                }
                '$' if matches!(self.peek_second(), Some('(' | '{')) => {
                    self.dollar_group(&mut buf)?
                }
                _ => {
                    buf.push(c);
                    self.bump();
                }
            }
        }
        Ok(buf)
    }

    fn single_quoted(&mut self, buf: &mut String) -> Result<(), LexerError> {
        let start = self.pos;
        self.bump();
        loop {
            match self.bump() {
                Some('\'') => return Ok(()),
                Some(c) => buf.push(c),
                None => {
                    return Err(LexerError::UnterminatedSingleQuote {
                        span: self.rest_span(start),
                    })
                }
            }
        }
    }

    fn double_quoted(&mut self, buf: &mut String) -> Result<(), LexerError> {
        let start = self.pos;
        self.bump();
        loop {
            match self.bump() {
                Some('"') => return Ok(()),
                Some('\\') => match self.bump() {
                    Some(c @ ('"' | '\\')) => buf.push(c),
                    Some(c) => {
                        buf.push('\\');
                        buf.push(c);
                    }
                    None => break,
                },
                Some(c) => buf.push(c),
                None => break,
            }
        }
        Err(LexerError::UnterminatedDoubleQuote {
            span: self.rest_span(start),
        })
    }

    /// Copy a `$(..)` / `${..}` group verbatim, tracking nesting and
    /// skipping over quoted sections inside it.
    fn dollar_group(&mut self, buf: &mut String) -> Result<(), LexerError> {
        let start = self.pos;
        let (open, close, label) = match self.peek_second() {
            Some('{') => ('{', '}', "${"),
            _ => ('(', ')', "$("),
        };
        let unterminated = |lexer: &Self| LexerError::UnterminatedGroup {
            open: label,
            span: lexer.rest_span(start),
        };

        // '$' and the opening delimiter
        for _ in 0..2 {
            if let Some(c) = self.bump() {
                buf.push(c);
            }
        }
        let mut depth = 1usize;
        while depth > 0 {
            let c = self.bump().ok_or_else(|| unterminated(self))?;
            buf.push(c);
            match c {
                '\\' => {
                    let next = self.bump().ok_or_else(|| unterminated(self))?;
                    buf.push(next);
                }
                '\'' | '"' => loop {
                    let q = self.bump().ok_or_else(|| unterminated(self))?;
                    buf.push(q);
                    if q == c {
                        break;
                    }
                },
                c if c == open => depth += 1,
                c if c == close => depth -= 1,
                _ => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "lexer_tests.rs"]
mod tests;
