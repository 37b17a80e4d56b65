//! Duration reconstruction.
//!
//! Rebuilds elapsed time per timer from an ordered start/end mark sequence.
//!
//! # Algorithm Summary
//!
//! Walking the marks in chronological order, per timer:
//!
//! 1. A `start` mark opens an interval. If it is the last mark of the whole
//!    input, the open interval is clamped to `now` and counted immediately,
//!    so a still-running timer contributes its in-progress time.
//! 2. An `end` mark closes the open interval and adds its span. When no
//!    start was seen (the window began after the timer was already running),
//!    the span is counted from the start of the end mark's local calendar
//!    day, so day-scoped queries still attribute partial credit.
//!
//! The log is trusted, not repaired: a second `start` with no intervening
//! `end` overwrites the open interval, and a span that resolves to a
//! negative length is added as-is.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::day::day_start_of;
use crate::mark::{MarkKind, TimeMark};
use crate::types::TimerName;

/// Reconstructed time for a single timer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    /// Total elapsed milliseconds attributed to the timer.
    pub total_ms: i64,

    /// Whether the timer's last mark was an unterminated start.
    pub running: bool,
}

/// Rebuilds elapsed durations from marks ordered by time.
///
/// `now` is the evaluation instant used to clamp a trailing unterminated
/// start. The input may span several timers (day reports) or contain the
/// full log of a single one (live displays); every timer that appears in
/// `marks` gets a tally, even if its total is zero.
pub fn reconstruct(marks: &[TimeMark], now: DateTime<Utc>) -> HashMap<TimerName, Tally> {
    let mut tallies: HashMap<TimerName, Tally> = HashMap::new();
    let mut open_starts: HashMap<TimerName, DateTime<Utc>> = HashMap::new();

    for (index, mark) in marks.iter().enumerate() {
        let tally = tallies.entry(mark.timer.clone()).or_default();
        match mark.kind {
            MarkKind::Start => {
                open_starts.insert(mark.timer.clone(), mark.at);
                tally.running = true;

                // cut to now
                if index == marks.len() - 1 {
                    tally.total_ms += (now - mark.at).num_milliseconds();
                }
            }
            MarkKind::End => {
                let start = open_starts.get(&mark.timer).copied().unwrap_or_else(|| {
                    tracing::debug!(
                        timer = %mark.timer,
                        at = %mark.at,
                        "end mark without a recorded start, counting from day start"
                    );
                    day_start_of(mark.at)
                });
                tally.total_ms += (mark.at - start).num_milliseconds();
                tally.running = false;
            }
        }
    }

    tallies
}
