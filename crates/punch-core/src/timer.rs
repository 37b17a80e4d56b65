//! Timers - named activities whose use is tracked over time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::TimerName;

/// A named, user-defined activity being tracked.
///
/// The name is the timer's identity. Creating a timer whose name already
/// exists only bumps `last_started` (upsert semantics); timers are never
/// deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Timer {
    /// Unique name, also the storage key.
    pub title: TimerName,

    /// When this timer was most recently started (or created).
    ///
    /// Drives the most-recently-used ordering of timer lists.
    pub last_started: DateTime<Utc>,
}

impl Timer {
    /// Creates a timer last started at the given instant.
    pub fn new(title: TimerName, last_started: DateTime<Utc>) -> Self {
        Self {
            title,
            last_started,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_serialization_roundtrip() {
        let timer = Timer::new(TimerName::new("Writing").unwrap(), Utc::now());

        let json = serde_json::to_string(&timer).unwrap();
        let parsed: Timer = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, timer);
    }
}
