//! Status command for showing the active timer.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Local, Utc};

use punch_core::reconstruct;
use punch_db::Store;

use super::util::format_duration;

pub fn run<W: Write>(writer: &mut W, store: &Store) -> Result<()> {
    run_at(writer, store, Utc::now())
}

fn run_at<W: Write>(writer: &mut W, store: &Store, now: DateTime<Utc>) -> Result<()> {
    let snapshot = store.snapshot();

    let Some(active) = &snapshot.active_timer else {
        writeln!(writer, "No active timer.")?;
        return Ok(());
    };

    // The log, not the snapshot, is the source of truth for the running
    // flag and the tracked total.
    let marks = store.timer_marks(active)?;
    let tally = reconstruct(&marks, now)
        .get(active)
        .copied()
        .unwrap_or_default();

    writeln!(writer, "Active timer: {active}")?;
    writeln!(
        writer,
        "Status: {}",
        if tally.running { "running" } else { "stopped" }
    )?;
    writeln!(writer, "Tracked: {}", format_duration(tally.total_ms))?;

    if tally.running {
        if let Some(mark) = store.last_mark(active)? {
            let started = mark.at.with_timezone(&Local);
            writeln!(writer, "Started at: {}", started.format("%H:%M:%S"))?;
        }
    }

    Ok(())
}
