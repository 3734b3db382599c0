// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Well-formed lines: chains, pipes and redirects.

use super::*;

#[test]
fn single_command() {
    let line = parse("print hello world");
    assert_eq!(shape(&line), vec![vec!["print hello world"]]);
    let head = &line.chains[0].head;
    assert_eq!(head.name, "print");
    assert_eq!(head.args, vec!["hello", "world"]);
    assert!(head.next.is_none());
    assert!(line.chains[0].redirect.is_none());
}

#[yare::parameterized(
    empty         = { "" },
    blank         = { "   " },
    comment_only  = { "# nothing here" },
)]
fn nothing_to_run(input: &str) {
    assert!(parse(input).is_empty());
}

#[test]
fn pipes_link_stages_in_order() {
    let line = parse("print a | grep a | grep -v b");
    assert_eq!(line.chains.len(), 1);
    assert_eq!(line.chains[0].head.len(), 3);
    assert_eq!(
        shape(&line),
        vec![vec!["print a", "grep a", "grep -v b"]]
    );
}

#[test]
fn semicolons_split_chains() {
    let line = parse("set x 1; print @x ; vars");
    assert_eq!(
        shape(&line),
        vec![vec!["set x 1"], vec!["print @x"], vec!["vars"]]
    );
}

#[test]
fn trailing_semicolon_is_allowed() {
    assert_eq!(shape(&parse("print a;")), vec![vec!["print a"]]);
}

#[test]
fn quoted_operators_are_literal() {
    let line = parse("print 'a | b' \"c ; d\" '>'");
    assert_eq!(line.chains.len(), 1);
    assert_eq!(line.chains[0].head.args, vec!["a | b", "c ; d", ">"]);
}

#[test]
fn substitution_groups_do_not_split() {
    let line = parse("print $(print a | grep a); print $((2 * 3))");
    assert_eq!(line.chains.len(), 2);
    assert_eq!(line.chains[0].head.args, vec!["$(print a | grep a)"]);
    assert_eq!(line.chains[1].head.args, vec!["$((2 * 3))"]);
}

#[yare::parameterized(
    truncate = { "print a | grep a > out.txt",  false },
    append   = { "print a | grep a >> out.txt", true },
)]
fn redirect_attaches_to_chain(input: &str, append: bool) {
    let line = parse(input);
    let chain = &line.chains[0];
    let redirect = chain.redirect.as_ref().unwrap();
    assert_eq!(redirect.target, "out.txt");
    assert_eq!(redirect.append, append);
    assert_eq!(chain.head.len(), 2);
}

#[test]
fn redirect_per_chain() {
    let line = parse("print a > a.txt; print b; print c >> c.txt");
    let targets: Vec<Option<&str>> = line
        .chains
        .iter()
        .map(|c| c.redirect.as_ref().map(|r| r.target.as_str()))
        .collect();
    assert_eq!(targets, vec![Some("a.txt"), None, Some("c.txt")]);
}

#[test]
fn quoted_redirect_target() {
    let line = parse("print a > 'my file.txt'");
    assert_eq!(
        line.chains[0].redirect.as_ref().unwrap().target,
        "my file.txt"
    );
}

#[test]
fn chain_span_covers_pipeline_and_redirect() {
    let input = "print a | grep a > out.txt; vars";
    let line = parse(input);
    assert_eq!(line.chains[0].span.slice(input), "print a | grep a > out.txt");
    assert_eq!(line.chains[1].span.slice(input), "vars");
}
