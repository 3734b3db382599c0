//! Pipeline and chain execution specs

use crate::prelude::*;

#[test]
fn pipe_feeds_the_next_stage() {
    cli()
        .lines(&[r#"print "apple\nbanana\ncherry" | grep an"#])
        .passes()
        .stdout_eq("banana\n");
}

#[test]
fn chained_outputs_are_joined() {
    cli()
        .lines(&["print a; print b; print c"])
        .passes()
        .stdout_eq("a\nb\nc\n");
}

#[test]
fn stages_reach_the_system_shell() {
    cli()
        .lines(&["print shout | sh 'tr a-z A-Z'"])
        .passes()
        .stdout_eq("SHOUT\n");
}

#[test]
fn command_substitution_in_values() {
    cli()
        .lines(&["set @v $(print inner | grep inn)", "print [@v]"])
        .passes()
        .stdout_eq("[inner]\n");
}

#[test]
fn quoted_separators_are_literal() {
    cli()
        .lines(&["print 'a; b | c > d'"])
        .passes()
        .stdout_eq("a; b | c > d\n");
}
