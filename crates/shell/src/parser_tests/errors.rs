// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Malformed lines and their diagnostics.

use super::*;
use crate::error::LexerError;

#[yare::parameterized(
    leading_pipe   = { "| grep x",        "|", 0 },
    trailing_pipe  = { "print a |",       "|", 9 },
    double_pipe    = { "print a | | b",   "|", 10 },
    pipe_then_semi = { "print a | ; b",   "|", 10 },
    leading_semi   = { "; print a",       ";", 0 },
    double_semi    = { "print a ; ; b",   ";", 10 },
    bare_redirect  = { "> out.txt",       ">", 0 },
    bare_append    = { ">> out.txt",      ">>", 0 },
)]
fn missing_operand(input: &str, operator: &str, start: usize) {
    match Parser::parse(input) {
        Err(ParseError::MissingOperand { operator: op, span }) => {
            assert_eq!(op, operator);
            assert_eq!(span.start, start);
        }
        other => panic!("expected MissingOperand for {input:?}, got {other:?}"),
    }
}

#[yare::parameterized(
    at_end      = { "print a >",         ">" },
    append_end  = { "print a >>",        ">>" },
    before_semi = { "print a > ; print", ">" },
    before_pipe = { "print a > | grep",  ">" },
)]
fn missing_redirect_target(input: &str, operator: &str) {
    match Parser::parse(input) {
        Err(ParseError::MissingRedirectTarget { operator: op, .. }) => assert_eq!(op, operator),
        other => panic!("expected MissingRedirectTarget for {input:?}, got {other:?}"),
    }
}

#[yare::parameterized(
    extra_word     = { "print a > out.txt extra" },
    pipe_after     = { "print a > out.txt | grep a" },
    two_redirects  = { "print a > one > two" },
)]
fn redirect_must_end_chain(input: &str) {
    assert!(matches!(
        Parser::parse(input),
        Err(ParseError::UnexpectedToken { .. })
    ));
}

#[test]
fn lexer_errors_surface() {
    let err = Parser::parse("print 'open").unwrap_err();
    assert!(matches!(
        err,
        ParseError::Lexer(LexerError::UnterminatedSingleQuote { .. })
    ));
    assert_eq!(err.span().start, 6);
}

#[test]
fn context_points_at_error() {
    let input = "print a | | b";
    let err = Parser::parse(input).unwrap_err();
    assert_eq!(err.context(input), "print a | | b\n          ^");
}

#[test]
fn diagnostic_includes_message_and_column() {
    let input = "print a |";
    let err = Parser::parse(input).unwrap_err();
    let diag = err.diagnostic(input);
    assert!(diag.starts_with("error: missing command around '|'"), "{diag}");
    assert!(diag.contains("(column 10)"), "{diag}");
    assert!(diag.ends_with("  |          ^"), "{diag}");
}
