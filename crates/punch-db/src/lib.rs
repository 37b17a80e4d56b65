//! Storage layer for the punch timer tracker.
//!
//! Provides persistence for timers and their start/end mark log using
//! `rusqlite`, plus the stateful [`Store`] facade in [`store`].
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but
//! not `Sync`. A `Database` instance can be moved between threads but cannot
//! be shared across threads without external synchronization.
//!
//! # Schema
//!
//! ## Timestamp Format
//!
//! Timestamps are stored as TEXT in ISO 8601 format with millisecond
//! precision (e.g., `2024-01-15T10:30:00.000Z`). This format is used by
//! `chrono::DateTime<Utc>` serialization and ensures:
//! - Lexicographic ordering matches chronological ordering
//! - Human-readable values in the database
//! - Timezone-aware (always UTC)
//!
//! ## Mark Log
//!
//! The `time_marks` table is an append-only log keyed by an auto-assigned
//! rowid; marks are never updated or deleted. The expected alternation of
//! start/end marks per timer is a convention of the writers, not a
//! constraint of the schema, which keeps the log audit-friendly.

pub mod store;

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;

use punch_core::{MarkKind, TimeMark, Timer, TimerName};

pub use store::{ListenerId, Snapshot, Store};

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Failed to parse a stored timestamp.
    #[error("invalid timestamp for {context}: {timestamp}")]
    TimestampParse {
        context: String,
        timestamp: String,
        #[source]
        source: chrono::ParseError,
    },
    /// A stored mark kind was neither `start` nor `end`.
    #[error("invalid mark kind for {context}")]
    InvalidMarkKind {
        context: String,
        #[source]
        source: punch_core::UnknownMarkKind,
    },
    /// A stored timer name failed validation.
    #[error("invalid stored timer name")]
    InvalidTimerName(#[from] punch_core::ValidationError),
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS timers (
                title TEXT PRIMARY KEY,
                last_started TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_timers_last_started ON timers(last_started);

            -- time_marks table: append-only start/end log
            -- at: ISO 8601 format (e.g., '2024-01-15T10:30:00.000Z')
            -- kind: 'start' or 'end'
            CREATE TABLE IF NOT EXISTS time_marks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timer TEXT NOT NULL,
                at TEXT NOT NULL,
                kind TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_time_marks_timer ON time_marks(timer);
            CREATE INDEX IF NOT EXISTS idx_time_marks_at ON time_marks(at);
            ",
        )?;
        Ok(())
    }

    /// Inserts a timer or, if the title exists, overwrites `last_started` only.
    pub fn upsert_timer(
        &mut self,
        title: &TimerName,
        last_started: DateTime<Utc>,
    ) -> Result<(), DbError> {
        self.conn.execute(
            "
            INSERT INTO timers (title, last_started)
            VALUES (?, ?)
            ON CONFLICT(title) DO UPDATE SET last_started = excluded.last_started
            ",
            params![title.as_str(), format_timestamp(last_started)],
        )?;
        Ok(())
    }

    /// Fetches a timer by title.
    pub fn get_timer(&self, title: &TimerName) -> Result<Option<Timer>, DbError> {
        let row = self
            .conn
            .query_row(
                "SELECT title, last_started FROM timers WHERE title = ?",
                [title.as_str()],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;
        row.map(|(title, last_started)| timer_from_row(&title, &last_started))
            .transpose()
    }

    /// Lists all timers, most recently used first.
    pub fn list_timers(&self) -> Result<Vec<Timer>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT title, last_started
            FROM timers
            ORDER BY last_started DESC, title ASC
            ",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        let mut timers = Vec::new();
        for row in rows {
            let (title, last_started) = row?;
            timers.push(timer_from_row(&title, &last_started)?);
        }
        Ok(timers)
    }

    /// Appends a mark to the log, returning its assigned rowid.
    pub fn insert_mark(&mut self, mark: &TimeMark) -> Result<i64, DbError> {
        self.conn.execute(
            "INSERT INTO time_marks (timer, at, kind) VALUES (?, ?, ?)",
            params![
                mark.timer.as_str(),
                format_timestamp(mark.at),
                mark.kind.as_str()
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Lists all marks for one timer, ordered by timestamp then rowid.
    pub fn marks_for_timer(&self, title: &TimerName) -> Result<Vec<TimeMark>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT timer, at, kind
            FROM time_marks
            WHERE timer = ?
            ORDER BY at ASC, id ASC
            ",
        )?;
        let rows = stmt.query_map([title.as_str()], mark_row)?;
        collect_marks(rows)
    }

    /// Lists marks within a closed time interval `[start, end]`.
    pub fn marks_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<TimeMark>, DbError> {
        if end < start {
            return Ok(Vec::new());
        }
        let mut stmt = self.conn.prepare(
            "
            SELECT timer, at, kind
            FROM time_marks
            WHERE at >= ? AND at <= ?
            ORDER BY at ASC, id ASC
            ",
        )?;
        let rows = stmt.query_map(
            [format_timestamp(start), format_timestamp(end)],
            mark_row,
        )?;
        collect_marks(rows)
    }

    /// Fetches the single most recent mark across all timers.
    ///
    /// Used at startup to decide whether anything is presumed running.
    pub fn last_mark(&self) -> Result<Option<TimeMark>, DbError> {
        let row = self
            .conn
            .query_row(
                "
                SELECT timer, at, kind
                FROM time_marks
                ORDER BY at DESC, id DESC
                LIMIT 1
                ",
                [],
                mark_row,
            )
            .optional()?;
        row.map(|(timer, at, kind)| mark_from_row(&timer, &at, &kind))
            .transpose()
    }

    /// Fetches the most recent mark for one timer.
    pub fn last_mark_for_timer(&self, title: &TimerName) -> Result<Option<TimeMark>, DbError> {
        let row = self
            .conn
            .query_row(
                "
                SELECT timer, at, kind
                FROM time_marks
                WHERE timer = ?
                ORDER BY at DESC, id DESC
                LIMIT 1
                ",
                [title.as_str()],
                mark_row,
            )
            .optional()?;
        row.map(|(timer, at, kind)| mark_from_row(&timer, &at, &kind))
            .transpose()
    }

    /// Records a timer start, atomically closing the previously running
    /// timer when one is given.
    ///
    /// All three writes (the implicit end mark, the start mark, and the
    /// `last_started` bump) land in one transaction, so a crash cannot leave
    /// two timers started or neither.
    pub fn switch_timer(
        &mut self,
        stop: Option<&TimerName>,
        start: &TimerName,
        at: DateTime<Utc>,
    ) -> Result<(), DbError> {
        let ts = format_timestamp(at);
        let tx = self.conn.transaction()?;
        if let Some(stopped) = stop {
            tx.execute(
                "INSERT INTO time_marks (timer, at, kind) VALUES (?, ?, ?)",
                params![stopped.as_str(), ts, MarkKind::End.as_str()],
            )?;
        }
        tx.execute(
            "INSERT INTO time_marks (timer, at, kind) VALUES (?, ?, ?)",
            params![start.as_str(), ts, MarkKind::Start.as_str()],
        )?;
        tx.execute(
            "
            INSERT INTO timers (title, last_started)
            VALUES (?, ?)
            ON CONFLICT(title) DO UPDATE SET last_started = excluded.last_started
            ",
            params![start.as_str(), ts],
        )?;
        tx.commit()?;
        Ok(())
    }
}

type MarkRow = (String, String, String);

fn mark_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<MarkRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
}

fn collect_marks(
    rows: impl Iterator<Item = rusqlite::Result<MarkRow>>,
) -> Result<Vec<TimeMark>, DbError> {
    let mut marks = Vec::new();
    for row in rows {
        let (timer, at, kind) = row?;
        marks.push(mark_from_row(&timer, &at, &kind)?);
    }
    Ok(marks)
}

fn timer_from_row(title: &str, last_started: &str) -> Result<Timer, DbError> {
    Ok(Timer::new(
        TimerName::new(title)?,
        parse_timestamp(last_started, title)?,
    ))
}

fn mark_from_row(timer: &str, at: &str, kind: &str) -> Result<TimeMark, DbError> {
    Ok(TimeMark {
        timer: TimerName::new(timer)?,
        at: parse_timestamp(at, timer)?,
        kind: kind.parse().map_err(|source| DbError::InvalidMarkKind {
            context: timer.to_string(),
            source,
        })?,
    })
}

fn parse_timestamp(timestamp: &str, context: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|source| DbError::TimestampParse {
            context: context.to_string(),
            timestamp: timestamp.to_string(),
            source,
        })
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}
