//! Report command for rebuilding tracked time per day.
//!
//! A report runs one duration reconstruction per calendar day over the
//! marks falling inside that day's closed window, so a timer that was
//! already running when the day began still gets partial credit.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use punch_core::{TimerName, reconstruct};
use punch_db::Store;

use super::util::format_duration;

/// Reconstructed totals for one timer on one day.
#[derive(Debug, Clone, Serialize)]
pub struct DayEntry {
    pub title: TimerName,
    pub total_ms: i64,
    pub running: bool,
}

/// One day of a report.
#[derive(Debug, Clone, Serialize)]
pub struct DayReport {
    pub date: NaiveDate,
    pub total_ms: i64,
    pub entries: Vec<DayEntry>,
}

/// Machine-readable report document.
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    generated_at: String,
    days: &'a [DayReport],
}

/// Expands an inclusive-exclusive date pair into individual days.
///
/// A degenerate range (start on or after end) still reports the start day.
pub fn date_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    if start >= end {
        return vec![start];
    }

    let mut days = Vec::new();
    let mut current = start;
    while current < end {
        days.push(current);
        current += chrono::Duration::days(1);
    }
    days
}

/// Rebuilds one day's totals from the marks inside its window.
fn day_report(store: &Store, date: NaiveDate, now: DateTime<Utc>) -> Result<DayReport> {
    let marks = store.marks_at(date)?;
    let mut entries: Vec<DayEntry> = reconstruct(&marks, now)
        .into_iter()
        .map(|(title, tally)| DayEntry {
            title,
            total_ms: tally.total_ms,
            running: tally.running,
        })
        .collect();
    entries.sort_by(|a, b| {
        b.total_ms
            .cmp(&a.total_ms)
            .then_with(|| a.title.cmp(&b.title))
    });

    let total_ms = entries.iter().map(|entry| entry.total_ms).sum();
    Ok(DayReport {
        date,
        total_ms,
        entries,
    })
}

pub fn run<W: Write>(writer: &mut W, store: &Store, dates: &[NaiveDate], json: bool) -> Result<()> {
    run_at(writer, store, dates, json, Utc::now())
}

fn run_at<W: Write>(
    writer: &mut W,
    store: &Store,
    dates: &[NaiveDate],
    json: bool,
    now: DateTime<Utc>,
) -> Result<()> {
    let mut days = Vec::with_capacity(dates.len());
    for date in dates {
        days.push(day_report(store, *date, now)?);
    }

    if json {
        let report = JsonReport {
            generated_at: now.to_rfc3339(),
            days: &days,
        };
        writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
        return Ok(());
    }

    if days.iter().all(|day| day.entries.is_empty()) {
        writeln!(writer, "No marks in this period.")?;
        return Ok(());
    }

    for day in days.iter().filter(|day| !day.entries.is_empty()) {
        writeln!(writer, "{}", day.date.format("%d.%m.%Y"))?;
        writeln!(writer, "Total: {}", format_duration(day.total_ms))?;
        for entry in &day.entries {
            let suffix = if entry.running { " (running)" } else { "" };
            writeln!(
                writer,
                "  {:<26} {}{suffix}",
                entry.title,
                format_duration(entry.total_ms)
            )?;
        }
        writeln!(writer)?;
    }

    Ok(())
}
