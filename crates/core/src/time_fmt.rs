// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Human-readable durations for job listings.

use std::time::Duration;

/// Format a duration compactly: `"350ms"`, `"5s"`, `"2m5s"`, `"1h30m"`, `"3d"`.
///
/// Sub-second durations keep millisecond precision since most jobs are short.
/// Minute and hour ranges include the next smaller unit when non-zero.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs == 0 {
        return format!("{}ms", d.as_millis());
    }
    match secs {
        0..=59 => format!("{}s", secs),
        60..=3599 => with_remainder(secs / 60, "m", secs % 60, "s"),
        3600..=86399 => with_remainder(secs / 3600, "h", (secs % 3600) / 60, "m"),
        _ => format!("{}d", secs / 86400),
    }
}

fn with_remainder(major: u64, major_unit: &str, minor: u64, minor_unit: &str) -> String {
    if minor == 0 {
        format!("{major}{major_unit}")
    } else {
        format!("{major}{major_unit}{minor}{minor_unit}")
    }
}

#[cfg(test)]
#[path = "time_fmt_tests.rs"]
mod tests;
