// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! sk - run command lines through the sk engine

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod env;
mod exit_error;
mod logging;
mod output;
mod runner;

use anyhow::{Context, Result};
use clap::Parser;
use exit_error::ExitError;
use output::{format_error, OutputFormat};
use sk_engine::{Engine, EngineConfig};
use std::path::PathBuf;

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;

#[derive(Parser, Debug)]
#[command(
    name = "sk",
    version,
    about = "sk - command lines with aliases, variables, pipelines and jobs"
)]
struct Cli {
    /// Run LINE and exit; repeat to run several lines in order
    #[arg(short = 'c', long = "command", value_name = "LINE")]
    commands: Vec<String>,

    /// Run each line of FILE, stopping at the first failure
    #[arg(value_name = "FILE", conflicts_with = "commands")]
    script: Option<PathBuf>,

    /// Deepest allowed nesting of @exec: and $(..) calls
    #[arg(long, value_name = "N", value_parser = parse_depth)]
    max_depth: Option<usize>,

    /// Write logs to FILE instead of stderr
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Output format
    #[arg(short = 'o', long = "output", value_enum, default_value_t)]
    output: OutputFormat,
}

fn parse_depth(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

impl Cli {
    fn engine_config(&self) -> EngineConfig {
        let mut config = EngineConfig::from_env();
        if let Some(depth) = self.max_depth {
            config.max_depth = depth;
        }
        config
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        let code = e.downcast_ref::<ExitError>().map_or(1, |c| c.code);
        let msg = format_error(&e);
        if !msg.is_empty() {
            eprintln!("Error: {}", msg);
        }
        std::process::exit(code);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let log_file = cli.log_file.clone().or_else(env::log_file);
    let _log_guard = logging::setup(log_file.as_deref())?;

    let engine = Engine::builder().config(cli.engine_config()).build();
    tracing::debug!(config = ?engine.config(), "engine ready");

    let code = if !cli.commands.is_empty() {
        runner::run_all(&engine, cli.commands.iter().map(String::as_str), cli.output).await
    } else if let Some(path) = &cli.script {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read script {}", path.display()))?;
        runner::run_all(&engine, text.lines(), cli.output).await
    } else {
        runner::run_stdin(&engine, cli.output).await?
    };

    let killed = engine.jobs().kill_all().await;
    if killed > 0 {
        tracing::info!(killed, "stopped background jobs on exit");
    }

    if code != 0 {
        return Err(ExitError::new(code, String::new()).into());
    }
    Ok(())
}
