//! List command for showing timers by recency.

use std::io::Write;

use anyhow::Result;
use chrono::Local;

use punch_db::Store;

pub fn run<W: Write>(writer: &mut W, store: &Store) -> Result<()> {
    let timers = store.all_timers()?;

    if timers.is_empty() {
        writeln!(writer, "No timers yet.")?;
        return Ok(());
    }

    let active = store.snapshot().active_timer.clone();
    for timer in timers {
        let marker = if Some(&timer.title) == active.as_ref() {
            "*"
        } else {
            " "
        };
        let last_started = timer.last_started.with_timezone(&Local);
        writeln!(
            writer,
            "{marker} {:<28} last started {}",
            timer.title,
            last_started.format("%Y-%m-%d %H:%M")
        )?;
    }

    Ok(())
}
