//! Start/end marks - the append-only log a timer's elapsed time is rebuilt from.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::TimerName;

/// Whether a mark opens or closes a tracked interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkKind {
    Start,
    End,
}

impl MarkKind {
    /// String representation for database storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
        }
    }
}

impl fmt::Display for MarkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MarkKind {
    type Err = UnknownMarkKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(Self::Start),
            "end" => Ok(Self::End),
            _ => Err(UnknownMarkKind(s.to_string())),
        }
    }
}

impl Serialize for MarkKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MarkKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for unknown mark kind strings.
#[derive(Debug, Clone, Error)]
#[error("unknown mark kind: {0}")]
pub struct UnknownMarkKind(String);

/// One logged start or end event for a timer.
///
/// Marks are append-only: they are never updated or deleted once written.
/// For a well-formed log the marks of a given timer alternate start, end,
/// start, end, with at most one trailing unterminated start (the timer that
/// is still running). Nothing enforces this shape at the storage layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeMark {
    /// The timer this mark belongs to.
    pub timer: TimerName,
    /// When the mark was recorded.
    pub at: DateTime<Utc>,
    /// Start or end.
    pub kind: MarkKind,
}

impl TimeMark {
    /// Creates a start mark for the given timer.
    pub fn start(timer: TimerName, at: DateTime<Utc>) -> Self {
        Self {
            timer,
            at,
            kind: MarkKind::Start,
        }
    }

    /// Creates an end mark for the given timer.
    pub fn end(timer: TimerName, at: DateTime<Utc>) -> Self {
        Self {
            timer,
            at,
            kind: MarkKind::End,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_kind_roundtrip() {
        for kind in [MarkKind::Start, MarkKind::End] {
            let s = kind.to_string();
            let parsed: MarkKind = s.parse().expect("should parse");
            assert_eq!(parsed, kind, "roundtrip failed for {kind:?}");
        }
    }

    #[test]
    fn unknown_kind_errors() {
        let result: Result<MarkKind, _> = "pause".parse();
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "unknown mark kind: pause");
    }

    #[test]
    fn mark_serialization_roundtrip() {
        let mark = TimeMark::start(TimerName::new("Writing").unwrap(), Utc::now());

        let json = serde_json::to_string(&mark).unwrap();
        let parsed: TimeMark = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, mark);
    }

    #[test]
    fn mark_kind_serializes_as_plain_string() {
        let json = serde_json::to_string(&MarkKind::End).unwrap();
        assert_eq!(json, "\"end\"");
    }

    #[test]
    fn mark_rejects_empty_timer_name() {
        let json = r#"{
            "timer": "",
            "at": "2024-01-01T00:00:00Z",
            "kind": "start"
        }"#;
        let result: Result<TimeMark, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
