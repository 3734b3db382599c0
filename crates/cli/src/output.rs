// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::ValueEnum;
use serde::Serialize;
use sk_engine::EngineError;

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// What one executed line produced, ready for printing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineReport {
    pub line: String,
    pub ok: bool,
    /// Output of the line; for a failed line, whatever was produced
    /// before the failure.
    pub output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub cancelled: bool,
}

impl LineReport {
    pub fn new(line: &str, result: Result<String, EngineError>) -> Self {
        match result {
            Ok(output) => Self {
                line: line.to_string(),
                ok: true,
                output,
                error: None,
                cancelled: false,
            },
            Err(e) => Self {
                line: line.to_string(),
                ok: false,
                output: e.output().to_string(),
                cancelled: e.is_cancelled(),
                error: Some(format_error(&anyhow::Error::new(e))),
            },
        }
    }

    /// Process exit status for this line: 0, 1 on failure, 130 when
    /// interrupted.
    pub fn exit_code(&self) -> i32 {
        match (self.ok, self.cancelled) {
            (true, _) => 0,
            (false, true) => 130,
            (false, false) => 1,
        }
    }

    /// Render as (stdout, stderr) text, either of which may be empty.
    pub fn render(&self, format: OutputFormat) -> (String, String) {
        match format {
            OutputFormat::Json => {
                let json = serde_json::to_string(self).unwrap_or_else(|e| {
                    format!(r#"{{"ok":false,"error":"cannot encode result: {e}"}}"#)
                });
                (json, String::new())
            }
            OutputFormat::Text => {
                let stderr = self
                    .error
                    .as_ref()
                    .map(|e| format!("Error: {e}"))
                    .unwrap_or_default();
                (self.output.clone(), stderr)
            }
        }
    }

    pub fn print(&self, format: OutputFormat) {
        let (stdout, stderr) = self.render(format);
        if !stdout.is_empty() {
            println!("{stdout}");
        }
        if !stderr.is_empty() {
            eprintln!("{stderr}");
        }
    }
}

/// Format an anyhow error, deduplicating the chain.
///
/// If the top-level Display already contains the source error text, we skip
/// the "Caused by" chain to avoid noisy duplicate output (common when
/// thiserror variants embed their source in the message).
/// Otherwise we render the full chain so context isn't lost.
pub fn format_error(err: &anyhow::Error) -> String {
    let top = err.to_string();

    let chain_redundant = err
        .chain()
        .skip(1)
        .all(|cause| top.contains(&cause.to_string()));

    if chain_redundant {
        return top;
    }

    let mut buf = top;
    for (i, cause) in err.chain().skip(1).enumerate() {
        buf.push_str(&format!("\n\nCaused by:\n    {}: {}", i, cause));
    }
    buf
}
