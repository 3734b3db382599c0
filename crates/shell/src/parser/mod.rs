// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Turns a token stream into chains of piped commands.
//!
//! Grammar:
//!
//! ```text
//! line     := chain (';' chain)* ';'?
//! chain    := pipeline redirect?
//! pipeline := command ('|' command)*
//! command  := WORD WORD*
//! redirect := ('>' | '>>') WORD
//! ```

use crate::command::{Chain, ParsedCommand, ParsedLine, Redirect};
use crate::lexer::Lexer;
use crate::parse_error::ParseError;
use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Command line parser.
///
/// ```ignore
/// use sk_shell::Parser;
///
/// let line = Parser::parse("print a | grep a > out.txt; vars")?;
/// assert_eq!(line.chains.len(), 2);
/// assert_eq!(line.chains[0].stages().count(), 2);
/// # Ok::<(), sk_shell::ParseError>(())
/// ```
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    input_len: usize,
}

impl Parser {
    /// Parse a line. Blank and comment-only lines give an empty [`ParsedLine`].
    pub fn parse(input: &str) -> Result<ParsedLine, ParseError> {
        let tokens = Lexer::tokenize(input)?;
        let mut parser = Parser {
            tokens,
            pos: 0,
            input_len: input.len(),
        };
        parser.parse_line()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Span of the next token, or a zero-width span at end of input.
    fn here(&self) -> Span {
        self.peek()
            .map(|t| t.span)
            .unwrap_or_else(|| Span::at(self.input_len))
    }

    fn parse_line(&mut self) -> Result<ParsedLine, ParseError> {
        let mut chains = Vec::new();
        while let Some(token) = self.peek() {
            if token.kind == TokenKind::Semi {
                return Err(ParseError::MissingOperand {
                    operator: ";",
                    span: token.span,
                });
            }
            chains.push(self.parse_chain()?);

            match self.advance() {
                None => break,
                Some(Token {
                    kind: TokenKind::Semi,
                    ..
                }) => {}
                Some(token) => {
                    return Err(ParseError::UnexpectedToken {
                        found: token.kind,
                        expected: "';' or end of line",
                        span: token.span,
                    })
                }
            }
        }
        Ok(ParsedLine { chains })
    }

    fn parse_chain(&mut self) -> Result<Chain, ParseError> {
        let head = self.parse_pipeline()?;
        let mut span = head.span;
        for stage in head.stages() {
            span = span.merge(stage.span);
        }

        let redirect = match self.peek() {
            Some(Token {
                kind: TokenKind::Redirect { append },
                span: op_span,
            }) => {
                let (append, op_span) = (*append, *op_span);
                let operator = if append { ">>" } else { ">" };
                self.advance();
                let target_span = self.here();
                match self.advance() {
                    Some(Token {
                        kind: TokenKind::Word(target),
                        span: word_span,
                    }) => {
                        let span = op_span.merge(word_span);
                        Some(Redirect {
                            target,
                            append,
                            span,
                        })
                    }
                    _ => {
                        return Err(ParseError::MissingRedirectTarget {
                            operator,
                            span: target_span,
                        })
                    }
                }
            }
            _ => None,
        };
        if let Some(r) = &redirect {
            span = span.merge(r.span);
        }

        Ok(Chain {
            head,
            redirect,
            span,
        })
    }

    fn parse_pipeline(&mut self) -> Result<ParsedCommand, ParseError> {
        let mut stages = vec![self.parse_command()?];
        while matches!(self.peek(), Some(t) if t.kind == TokenKind::Pipe) {
            self.advance();
            match self.peek() {
                Some(Token {
                    kind: TokenKind::Word(_),
                    ..
                }) => stages.push(self.parse_command()?),
                _ => {
                    return Err(ParseError::MissingOperand {
                        operator: "|",
                        span: self.here(),
                    })
                }
            }
        }

        // Link back to front so each stage owns the ones after it.
        let mut next: Option<Box<ParsedCommand>> = None;
        while let Some(mut stage) = stages.pop() {
            stage.next = next;
            next = Some(Box::new(stage));
        }
        match next {
            Some(head) => Ok(*head),
            None => Err(ParseError::MissingOperand {
                operator: "|",
                span: self.here(),
            }),
        }
    }

    fn parse_command(&mut self) -> Result<ParsedCommand, ParseError> {
        let (name, mut span) = match self.peek() {
            Some(Token {
                kind: TokenKind::Word(name),
                span,
            }) => (name.clone(), *span),
            Some(token) => {
                let operator = match token.kind {
                    TokenKind::Pipe => "|",
                    TokenKind::Redirect { append: true } => ">>",
                    TokenKind::Redirect { append: false } => ">",
                    TokenKind::Semi | TokenKind::Word(_) => ";",
                };
                return Err(ParseError::MissingOperand {
                    operator,
                    span: token.span,
                });
            }
            None => {
                return Err(ParseError::MissingOperand {
                    operator: ";",
                    span: self.here(),
                })
            }
        };
        self.advance();

        let mut args = Vec::new();
        while let Some(Token {
            kind: TokenKind::Word(word),
            span: word_span,
        }) = self.peek()
        {
            args.push(word.clone());
            span = span.merge(*word_span);
            self.advance();
        }
        Ok(ParsedCommand::new(name, args, span))
    }
}

#[cfg(test)]
#[path = "../parser_tests/mod.rs"]
mod tests;
