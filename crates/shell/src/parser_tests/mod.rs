// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

mod chains;
mod errors;

use super::*;

pub(super) fn parse(input: &str) -> ParsedLine {
    Parser::parse(input).unwrap()
}

/// `name arg arg` for every stage of every chain.
pub(super) fn shape(line: &ParsedLine) -> Vec<Vec<String>> {
    line.chains
        .iter()
        .map(|chain| {
            chain
                .stages()
                .map(|stage| {
                    std::iter::once(stage.name.as_str())
                        .chain(stage.args.iter().map(String::as_str))
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .collect()
        })
        .collect()
}
