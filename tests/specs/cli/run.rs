//! Running lines from flags, scripts and stdin

use crate::prelude::*;

#[test]
fn command_flag_prints_output() {
    cli().lines(&["print hello"]).passes().stdout_eq("hello\n");
}

#[test]
fn lines_share_variables_and_aliases() {
    cli()
        .lines(&[
            "set @name world",
            "alias greet=print hello",
            "greet @name",
        ])
        .passes()
        .stdout_eq("hello world\n");
}

#[test]
fn arithmetic_in_set_values() {
    cli()
        .lines(&["set @x $((2 + 3 * 4))", "print @x"])
        .passes()
        .stdout_eq("14\n");
}

#[test]
fn stdin_lines_run_in_order() {
    cli()
        .stdin("set @who stdin\n\n# a comment\nprint from @who\nprint done\n")
        .passes()
        .stdout_eq("from stdin\ndone\n");
}

#[test]
fn script_file_runs_every_line() {
    let project = Project::empty();
    project.file(
        "setup.sk",
        "# greeting script\nalias hi=print hi\nset @n 3\nhi @n; print bye\n",
    );
    project
        .sk()
        .args(&["setup.sk"])
        .passes()
        .stdout_eq("hi 3\nbye\n");
}

#[test]
fn environment_tokens_resolve() {
    cli()
        .env("SK_SPEC_GREETING", "howdy")
        .lines(&["print @env:SK_SPEC_GREETING"])
        .passes()
        .stdout_eq("howdy\n");
}

#[test]
fn json_output_reports_each_line() {
    let run = cli()
        .args(&["-o", "json"])
        .lines(&["print one", "print two"])
        .passes();
    let lines: Vec<serde_json::Value> = run
        .stdout()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["line"], "print one");
    assert_eq!(lines[0]["ok"], true);
    assert_eq!(lines[1]["output"], "two");
}

#[test]
fn log_file_receives_tracing_output() {
    let project = Project::empty();
    project
        .sk()
        .env("SK_LOG", "debug")
        .args(&["--log-file", "logs/sk.log"])
        .lines(&["print logged"])
        .passes()
        .stdout_eq("logged\n")
        .stderr_eq("");
    assert!(project.read("logs/sk.log").contains("engine ready"));
}
