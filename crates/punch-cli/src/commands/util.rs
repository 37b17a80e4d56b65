//! Shared output helpers for commands.

use std::fmt::Write;

/// Formats milliseconds as `XhYmZs`, skipping zero hour/minute components.
///
/// Seconds are always shown, so a zero duration renders as `0s`. Negative
/// durations are not clamped; the seconds component carries the sign.
pub fn format_duration(ms: i64) -> String {
    let total_seconds = ms / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    let mut out = String::new();
    if hours != 0 {
        write!(out, "{hours}h ").unwrap();
    }
    if minutes != 0 {
        write!(out, "{minutes}m ").unwrap();
    }
    write!(out, "{seconds}s").unwrap();
    out
}
