//! CLI help and version specs

use crate::prelude::*;

#[test]
fn help_lists_the_flags() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("--command")
        .stdout_has("--max-depth")
        .stdout_has("--log-file")
        .stdout_has("--output");
}

#[test]
fn version_prints_the_crate_version() {
    cli()
        .args(&["--version"])
        .passes()
        .stdout_eq(&format!("sk {}\n", env!("CARGO_PKG_VERSION")));
}

#[test]
fn help_builtin_lists_commands() {
    cli()
        .lines(&["help"])
        .passes()
        .stdout_has("print")
        .stdout_has("alias")
        .stdout_has("job");
}
