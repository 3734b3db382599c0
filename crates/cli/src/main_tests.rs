// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::path::PathBuf;

use super::{Cli, OutputFormat};

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("sk").chain(args.iter().copied())).unwrap()
}

fn parse_err(args: &[&str]) -> ErrorKind {
    Cli::try_parse_from(std::iter::once("sk").chain(args.iter().copied()))
        .unwrap_err()
        .kind()
}

// -- Arguments ---------------------------------------------------------------

#[test]
fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn no_arguments_reads_stdin() {
    let cli = parse(&[]);
    assert!(cli.commands.is_empty());
    assert!(cli.script.is_none());
    assert_eq!(cli.output, OutputFormat::Text);
}

#[test]
fn command_flag_repeats_in_order() {
    let cli = parse(&["-c", "print a", "--command", "print b"]);
    assert_eq!(cli.commands, vec!["print a", "print b"]);
}

#[test]
fn script_path_is_positional() {
    let cli = parse(&["setup.sk"]);
    assert_eq!(cli.script, Some(PathBuf::from("setup.sk")));
}

#[test]
fn script_and_command_conflict() {
    assert_eq!(
        parse_err(&["-c", "print a", "setup.sk"]),
        ErrorKind::ArgumentConflict
    );
}

#[test]
fn output_format_json() {
    assert_eq!(parse(&["-o", "json"]).output, OutputFormat::Json);
    assert_eq!(parse_err(&["-o", "yaml"]), ErrorKind::InvalidValue);
}

#[yare::parameterized(
    one = { "1", Some(1) },
    typical = { "25", Some(25) },
    zero = { "0", None },
    negative = { "-3", None },
    word = { "deep", None },
)]
fn max_depth_values(raw: &str, expected: Option<usize>) {
    let parsed = Cli::try_parse_from(["sk", "--max-depth", raw]);
    match expected {
        Some(depth) => assert_eq!(parsed.unwrap().max_depth, Some(depth)),
        None => assert!(parsed.is_err(), "{raw} should be rejected"),
    }
}

#[test]
fn version_flag() {
    assert_eq!(parse_err(&["--version"]), ErrorKind::DisplayVersion);
}

// -- Engine configuration ----------------------------------------------------

#[test]
#[serial_test::serial]
fn max_depth_flag_overrides_environment() {
    std::env::set_var("SK_MAX_DEPTH", "4");
    assert_eq!(parse(&[]).engine_config().max_depth, 4);
    assert_eq!(parse(&["--max-depth", "7"]).engine_config().max_depth, 7);
    std::env::remove_var("SK_MAX_DEPTH");
    assert_eq!(
        parse(&[]).engine_config().max_depth,
        sk_engine::DEFAULT_MAX_DEPTH
    );
}

#[test]
#[serial_test::serial]
fn log_file_falls_back_to_environment() {
    std::env::set_var("SK_LOG_FILE", "/tmp/sk-test.log");
    assert_eq!(
        super::env::log_file(),
        Some(PathBuf::from("/tmp/sk-test.log"))
    );
    std::env::set_var("SK_LOG_FILE", "");
    assert_eq!(super::env::log_file(), None);
    std::env::remove_var("SK_LOG_FILE");
}

#[test]
#[serial_test::serial]
fn blank_log_filter_is_ignored() {
    std::env::set_var("SK_LOG", "  ");
    assert_eq!(super::env::log_filter(), None);
    std::env::set_var("SK_LOG", "sk_engine=debug");
    assert_eq!(super::env::log_filter().as_deref(), Some("sk_engine=debug"));
    std::env::remove_var("SK_LOG");
}
