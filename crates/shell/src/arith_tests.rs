// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn no_vars(_: &str) -> Option<i64> {
    None
}

#[yare::parameterized(
    literal        = { "42",              42 },
    addition       = { "1 + 2",           3 },
    left_to_right  = { "10 - 3 - 2",      5 },
    division_chain = { "100 / 10 / 5",    2 },
    precedence     = { "2 + 3 * 4",       14 },
    parens         = { "(2 + 3) * 4",     20 },
    nested_parens  = { "((1 + 1) * (2 + 2))", 8 },
    modulo         = { "17 % 5",          2 },
    unary_minus    = { "-3 + 5",          2 },
    double_neg     = { "--4",             4 },
    no_spaces      = { "6*7",             42 },
    truncating_div = { "7 / 2",           3 },
)]
fn evaluates(expr: &str, expected: i64) {
    assert_eq!(try_eval(expr, &no_vars), Ok(expected));
}

#[test]
fn identifiers_use_lookup() {
    let lookup = |name: &str| match name {
        "x" => Some(4),
        "@y" => Some(10),
        _ => None,
    };
    assert_eq!(eval("x * 2 + @y", &lookup), 18);
    assert_eq!(eval("missing + 1", &lookup), 1);
}

#[yare::parameterized(
    empty          = { "" },
    dangling_op    = { "1 +" },
    unbalanced     = { "(1 + 2" },
    stray_close    = { "1 + 2)" },
    garbage        = { "1 ? 2" },
    div_zero       = { "5 / 0" },
    mod_zero       = { "5 % 0" },
    overflow       = { "9223372036854775807 + 1" },
    huge_literal   = { "99999999999999999999" },
)]
fn malformed_degrades_to_zero(expr: &str) {
    assert!(try_eval(expr, &no_vars).is_err());
    assert_eq!(eval(expr, &no_vars), 0);
}

#[test]
fn error_kinds() {
    assert_eq!(try_eval("1 / 0", &no_vars), Err(ArithError::DivisionByZero));
    assert_eq!(try_eval("1 +", &no_vars), Err(ArithError::UnexpectedEnd));
    assert_eq!(
        try_eval("1 ? 2", &no_vars),
        Err(ArithError::Unexpected {
            found: "?".to_string(),
            offset: 2,
        })
    );
}
