//! Show command for one timer's tracked time.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};

use punch_core::{TimerName, reconstruct};
use punch_db::Store;

use super::util::format_duration;

pub fn run<W: Write>(writer: &mut W, store: &Store, title: &str) -> Result<()> {
    run_at(writer, store, title, Utc::now())
}

fn run_at<W: Write>(writer: &mut W, store: &Store, title: &str, now: DateTime<Utc>) -> Result<()> {
    let title = TimerName::new(title)?;
    let marks = store.timer_marks(&title)?;

    if marks.is_empty() {
        writeln!(writer, "No marks recorded for '{title}'.")?;
        return Ok(());
    }

    let tally = reconstruct(&marks, now)
        .get(&title)
        .copied()
        .unwrap_or_default();

    let suffix = if tally.running { " (running)" } else { "" };
    writeln!(writer, "{title}: {}{suffix}", format_duration(tally.total_ms))?;
    writeln!(writer, "Marks: {}", marks.len())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_timer_prints_a_hint() {
        let store = Store::open_in_memory().unwrap();
        let mut output = Vec::new();

        run(&mut output, &store, "Writing").unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "No marks recorded for 'Writing'.\n"
        );
    }

    #[test]
    fn closed_pair_shows_its_span_and_mark_count() {
        let mut store = Store::open_in_memory().unwrap();
        let name = TimerName::new("Writing").unwrap();
        store.start_timer(&name).unwrap();
        store.stop_timer(&name).unwrap();

        let marks = store.timer_marks(&name).unwrap();
        let now = marks.last().unwrap().at + chrono::Duration::hours(1);

        let mut output = Vec::new();
        run_at(&mut output, &store, "Writing", now).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.starts_with("Writing: "));
        assert!(!output.contains("(running)"));
        assert!(output.contains("Marks: 2"));
    }

    #[test]
    fn running_timer_is_flagged() {
        let mut store = Store::open_in_memory().unwrap();
        let name = TimerName::new("Writing").unwrap();
        store.start_timer(&name).unwrap();

        let start = store.last_mark(&name).unwrap().map(|m| m.at).unwrap();

        let mut output = Vec::new();
        run_at(
            &mut output,
            &store,
            "Writing",
            start + chrono::Duration::seconds(90),
        )
        .unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("Writing: 1m 30s (running)"));
    }
}
