//! CLI error handling specs
//!
//! Verify error messages and exit codes for failing lines.

use crate::prelude::*;

#[test]
fn unknown_command_shows_error() {
    cli()
        .lines(&["frobnicate now"])
        .fails()
        .exit_code(1)
        .stdout_eq("")
        .stderr_eq("Error: unknown command: frobnicate\n");
}

#[test]
fn syntax_error_shows_position() {
    cli()
        .lines(&["print a ;; print b"])
        .fails()
        .stderr_has("syntax error");
}

#[test]
fn output_before_a_failure_is_kept() {
    cli()
        .lines(&["print before; sh 'echo partial; exit 3'; print never"])
        .fails()
        .exit_code(1)
        .stdout_eq("before\npartial\n")
        .stderr_has("sh: exited with status 3");
}

#[test]
fn command_flags_stop_at_first_failure() {
    cli()
        .lines(&["print one", "nope", "print three"])
        .fails()
        .stdout_eq("one\n")
        .stdout_lacks("three");
}

#[test]
fn stdin_continues_after_a_failure() {
    cli()
        .stdin("nope\nprint after\n")
        .passes()
        .stdout_eq("after\n")
        .stderr_has("unknown command: nope");
}

#[test]
fn stdin_exit_code_follows_the_last_line() {
    cli().stdin("print ok\nnope\n").fails().exit_code(1);
}

#[test]
fn runaway_alias_hits_the_depth_limit() {
    cli()
        .lines(&["alias a=print @exec:a", "a"])
        .fails()
        .stderr_has("recursion")
        .stderr_has("execution depth");
}

#[test]
fn max_depth_flag_lowers_the_limit() {
    let line = "alias l1=print @exec:l2; alias l2=print @exec:l3; alias l3=print bottom";
    cli()
        .lines(&[line, "l1"])
        .passes()
        .stdout_eq("bottom\n");
    cli()
        .args(&["--max-depth", "2"])
        .lines(&[line, "l1"])
        .fails()
        .stderr_has("execution depth exceeded (2)");
}

#[test]
fn max_depth_from_environment() {
    cli()
        .env("SK_MAX_DEPTH", "1")
        .lines(&["print @exec:print nested"])
        .fails()
        .stderr_has("execution depth exceeded (1)");
}

#[test]
fn zero_max_depth_is_rejected() {
    cli()
        .args(&["--max-depth", "0", "-c", "print x"])
        .fails()
        .exit_code(2)
        .stderr_has("must be at least 1");
}

#[test]
fn missing_script_file() {
    let project = Project::empty();
    project
        .sk()
        .args(&["missing.sk"])
        .fails()
        .stderr_has("cannot read script missing.sk");
}
