// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Background jobs: `bg` and the `job` family.

use super::command_line;
use crate::error::CommandError;
use crate::registry::{Command, CommandSpec, Invocation, Output, Registry};
use async_trait::async_trait;
use sk_core::{format_duration, JobId, JobSnapshot};

pub(super) fn register(registry: &mut Registry) {
    registry.register(
        CommandSpec::new("bg", "bg <line>: run a line as a background job").raw_args(),
        Bg,
    );
    registry.register(CommandSpec::new("jobs", "list jobs"), List);
    registry.register(CommandSpec::new("job list", "list jobs"), List);
    registry.register(
        CommandSpec::new("job show", "job show <id> [--json]: show one job"),
        Show,
    );
    registry.register(
        CommandSpec::new("job logs", "job logs <id>: output captured so far"),
        Logs,
    );
    registry.register(
        CommandSpec::new("job wait", "job wait <id>: wait for a job, then print its output"),
        Wait,
    );
    registry.register(CommandSpec::new("job kill", "job kill <id>: stop a job"), Kill);
    registry.register(
        CommandSpec::new("job prune", "remove finished jobs"),
        Prune,
    );
}

fn job_id(inv: &Invocation, usage: &str) -> Result<JobId, CommandError> {
    inv.require(0, usage)?
        .parse()
        .map_err(|e: sk_core::ParseJobIdError| CommandError::failed(e.to_string()))
}

struct Bg;

#[async_trait]
impl Command for Bg {
    async fn run(&self, inv: Invocation) -> Result<Output, CommandError> {
        let line = command_line(&inv.args).ok_or_else(|| CommandError::usage("bg <line>"))?;
        let id = inv.engine.spawn_job_from(&inv.cx, line);
        Ok(Output::text(format!("[{id}]")))
    }
}

struct List;

#[async_trait]
impl Command for List {
    async fn run(&self, inv: Invocation) -> Result<Output, CommandError> {
        let lines: Vec<String> = inv
            .engine
            .jobs()
            .list()
            .iter()
            .map(JobSnapshot::summary_line)
            .collect();
        Ok(Output::text(lines.join("\n")))
    }
}

struct Show;

const SHOW_USAGE: &str = "job show <id> [--json]";

#[async_trait]
impl Command for Show {
    async fn run(&self, inv: Invocation) -> Result<Output, CommandError> {
        let id = job_id(&inv, SHOW_USAGE)?;
        let json = match inv.arg(1) {
            None => false,
            Some("--json") => true,
            Some(_) => return Err(CommandError::usage(SHOW_USAGE)),
        };
        let snapshot = inv
            .engine
            .jobs()
            .get(id)
            .ok_or(sk_core::JobError::NotFound(id))?;
        if json {
            let text = serde_json::to_string_pretty(&snapshot)
                .map_err(|e| CommandError::failed(e.to_string()))?;
            return Ok(Output::text(text));
        }
        Ok(Output::text(describe(&snapshot)))
    }
}

fn describe(job: &JobSnapshot) -> String {
    let mut lines = vec![
        format!("id:       {}", job.id),
        format!("command:  {}", job.command),
        format!("status:   {}", job.status),
        format!("elapsed:  {}", format_duration(job.elapsed())),
    ];
    if let Some(pid) = job.pid {
        lines.push(format!("pid:      {pid}"));
    }
    lines.push(format!("output:   {} bytes", job.output_bytes));
    if let Some(error) = &job.error {
        lines.push(format!("error:    {error}"));
    }
    lines.join("\n")
}

struct Logs;

#[async_trait]
impl Command for Logs {
    async fn run(&self, inv: Invocation) -> Result<Output, CommandError> {
        let id = job_id(&inv, "job logs <id>")?;
        Ok(Output::text(inv.engine.jobs().logs(id)?))
    }
}

struct Wait;

#[async_trait]
impl Command for Wait {
    async fn run(&self, inv: Invocation) -> Result<Output, CommandError> {
        let id = job_id(&inv, "job wait <id>")?;
        let jobs = inv.engine.jobs();
        tokio::select! {
            result = jobs.wait(id) => result?,
            _ = inv.cx.token().cancelled() => return Err(CommandError::Cancelled),
        }
        Ok(Output::text(jobs.logs(id)?))
    }
}

struct Kill;

#[async_trait]
impl Command for Kill {
    async fn run(&self, inv: Invocation) -> Result<Output, CommandError> {
        let id = job_id(&inv, "job kill <id>")?;
        inv.engine.jobs().kill(id).await?;
        Ok(Output::text(format!("[{id}] killed")))
    }
}

struct Prune;

#[async_trait]
impl Command for Prune {
    async fn run(&self, inv: Invocation) -> Result<Output, CommandError> {
        let pruned = inv.engine.jobs().prune();
        Ok(Output::text(format!("pruned {} job(s)", pruned.len())))
    }
}
