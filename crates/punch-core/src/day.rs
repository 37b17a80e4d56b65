//! Local calendar-day boundaries.
//!
//! Day reports and the reconstruction fallback both reason about "the day an
//! instant falls on" in the user's local timezone. The conversions here are
//! DST-aware.

use chrono::{DateTime, Local, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};

/// Converts a local date at midnight to UTC.
/// Handles DST ambiguity by picking the earlier time.
pub fn local_midnight_to_utc(local_date: NaiveDate) -> DateTime<Utc> {
    let midnight = local_date.and_time(NaiveTime::from_hms_opt(0, 0, 0).unwrap());
    match Local.from_local_datetime(&midnight) {
        // Single or ambiguous (DST fall-back): use the earlier time
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
        LocalResult::None => {
            // DST spring-forward gap at midnight is rare but possible
            // Use 1am local which is guaranteed to exist
            let one_am = local_date.and_time(NaiveTime::from_hms_opt(1, 0, 0).unwrap());
            Local
                .from_local_datetime(&one_am)
                .unwrap()
                .with_timezone(&Utc)
        }
    }
}

/// Returns the start of the local calendar day containing `at`.
pub fn day_start_of(at: DateTime<Utc>) -> DateTime<Utc> {
    local_midnight_to_utc(at.with_timezone(&Local).date_naive())
}

/// Returns the closed interval covering one local calendar day.
///
/// The upper bound is the last representable millisecond of the day, so a
/// mark written exactly at the next midnight falls into the next day.
pub fn day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = local_midnight_to_utc(date);
    let end = local_midnight_to_utc(date + chrono::Duration::days(1))
        - chrono::Duration::milliseconds(1);
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_bounds_cover_one_day() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 29).unwrap();
        let (start, end) = day_bounds(date);

        let start_local = start.with_timezone(&Local).date_naive();
        let end_local = end.with_timezone(&Local).date_naive();

        assert_eq!(start_local, date);
        assert_eq!(end_local, date);
        assert_eq!(
            end - start,
            chrono::Duration::days(1) - chrono::Duration::milliseconds(1)
        );
    }

    #[test]
    fn day_bounds_are_adjacent_across_days() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 29).unwrap();
        let (_, end) = day_bounds(date);
        let (next_start, _) = day_bounds(date + chrono::Duration::days(1));

        assert_eq!(next_start - end, chrono::Duration::milliseconds(1));
    }

    #[test]
    fn day_start_of_truncates_to_midnight() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let (start, end) = day_bounds(date);
        let midday = start + chrono::Duration::hours(13);

        assert_eq!(day_start_of(midday), start);
        assert_eq!(day_start_of(start), start);
        assert_eq!(day_start_of(end), start);
    }
}
