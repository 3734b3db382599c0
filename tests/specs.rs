//! Behavioral specifications for the sk CLI.
//!
//! These tests are black-box: they invoke the CLI binary and verify
//! stdout, stderr, and exit codes.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

#[path = "specs/prelude.rs"]
mod prelude;

// cli/
#[path = "specs/cli/errors.rs"]
mod cli_errors;
#[path = "specs/cli/help.rs"]
mod cli_help;
#[path = "specs/cli/run.rs"]
mod cli_run;

// pipeline/
#[path = "specs/pipeline/execution.rs"]
mod pipeline_execution;
#[path = "specs/pipeline/redirect.rs"]
mod pipeline_redirect;

// job/
#[path = "specs/job/background.rs"]
mod job_background;
