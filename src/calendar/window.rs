use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Serialize;

use crate::error::WindowError;

// Zones whose DST change lands on midnight have no 00:00 on that day.
const GAP_PROBE_STEP_MINUTES: i64 = 15;
const GAP_PROBE_LIMIT_MINUTES: i64 = 4 * 60;
// Whole days can be skipped (Pacific/Apia dropped 2011-12-30).
const MAX_SKIPPED_DAYS: u32 = 3;

/// Half-open interval `[start, end)` covering one calendar day in some zone.
///
/// `end` is the start of the following calendar day, so the window is 23 or 25
/// hours long on DST transition days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateWindow {
    pub day: NaiveDate,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateWindow {
    /// Window for the calendar day that `reference` falls on in `zone`.
    pub fn containing<Tz: TimeZone>(
        reference: DateTime<Utc>,
        zone: &Tz,
    ) -> Result<Self, WindowError> {
        let day = reference.with_timezone(zone).date_naive();
        Self::for_day(day, zone)
    }

    pub fn for_day<Tz: TimeZone>(day: NaiveDate, zone: &Tz) -> Result<Self, WindowError> {
        let start = start_of_day(day, zone)?;
        let end = start_of_following_day(day, zone)?;
        Ok(Self { day, start, end })
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// Start of the first day after `day` that has a local instant at all.
fn start_of_following_day<Tz: TimeZone>(
    day: NaiveDate,
    zone: &Tz,
) -> Result<DateTime<Utc>, WindowError> {
    let mut candidate = day;
    for _ in 0..=MAX_SKIPPED_DAYS {
        candidate = candidate.succ_opt().ok_or(WindowError::OutOfRange(day))?;
        match start_of_day(candidate, zone) {
            Err(WindowError::UnresolvableDayStart(_)) => continue,
            resolved => return resolved,
        }
    }
    Err(WindowError::UnresolvableDayStart(candidate))
}

fn start_of_day<Tz: TimeZone>(day: NaiveDate, zone: &Tz) -> Result<DateTime<Utc>, WindowError> {
    let midnight = day.and_time(NaiveTime::MIN);
    let mut offset_minutes = 0;

    while offset_minutes <= GAP_PROBE_LIMIT_MINUTES {
        let local = midnight
            .checked_add_signed(Duration::minutes(offset_minutes))
            .ok_or(WindowError::OutOfRange(day))?;

        match zone.from_local_datetime(&local) {
            LocalResult::Single(instant) => return Ok(instant.with_timezone(&Utc)),
            LocalResult::Ambiguous(earliest, _) => return Ok(earliest.with_timezone(&Utc)),
            LocalResult::None => offset_minutes += GAP_PROBE_STEP_MINUTES,
        }
    }

    Err(WindowError::UnresolvableDayStart(day))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Timelike};
    use chrono_tz::America::{New_York, Santiago};
    use chrono_tz::Asia::Tokyo;
    use chrono_tz::Pacific::Apia;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn regular_day_is_twenty_four_hours() {
        let window = DateWindow::for_day(date(2024, 6, 1), &New_York).unwrap();
        assert_eq!(window.duration(), Duration::hours(24));
    }

    #[test]
    fn spring_forward_day_is_twenty_three_hours() {
        let window = DateWindow::for_day(date(2024, 3, 10), &New_York).unwrap();

        assert_eq!(window.duration(), Duration::hours(23));
        assert_eq!(window.start.to_rfc3339(), "2024-03-10T05:00:00+00:00");
        assert_eq!(window.end.to_rfc3339(), "2024-03-11T04:00:00+00:00");
    }

    #[test]
    fn fall_back_day_is_twenty_five_hours() {
        let window = DateWindow::for_day(date(2024, 11, 3), &New_York).unwrap();
        assert_eq!(window.duration(), Duration::hours(25));
    }

    #[test]
    fn start_is_local_midnight_of_reference_day() {
        // 23:30 local on the 9th is already the 10th in UTC.
        let reference = DateTime::parse_from_rfc3339("2024-03-09T23:30:00-05:00")
            .unwrap()
            .with_timezone(&Utc);
        let window = DateWindow::containing(reference, &New_York).unwrap();

        assert_eq!(window.day, date(2024, 3, 9));
        let local_start = window.start.with_timezone(&New_York);
        assert_eq!((local_start.hour(), local_start.minute()), (0, 0));
        assert!(window.contains(reference));
    }

    #[test]
    fn window_is_half_open() {
        let window = DateWindow::for_day(date(2024, 1, 15), &Tokyo).unwrap();
        assert!(window.contains(window.start));
        assert!(!window.contains(window.end));
    }

    #[test]
    fn fixed_offset_zone_is_supported() {
        let zone = FixedOffset::east_opt(9 * 3600).unwrap();
        let window = DateWindow::for_day(date(2024, 3, 10), &zone).unwrap();
        assert_eq!(window.start.to_rfc3339(), "2024-03-09T15:00:00+00:00");
        assert_eq!(window.duration(), Duration::hours(24));
    }

    #[test]
    fn missing_midnight_starts_at_first_valid_instant() {
        // Chile skipped 00:00-01:00 on 2022-09-11.
        let window = DateWindow::for_day(date(2022, 9, 11), &Santiago).unwrap();
        let local_start = window.start.with_timezone(&Santiago);

        assert_eq!(local_start.date_naive(), date(2022, 9, 11));
        assert_eq!((local_start.hour(), local_start.minute()), (1, 0));
        assert_eq!(window.duration(), Duration::hours(23));
    }

    #[test]
    fn day_before_a_skipped_day_ends_at_the_next_real_day() {
        // Samoa jumped from 2011-12-29 straight to 2011-12-31.
        let window = DateWindow::for_day(date(2011, 12, 29), &Apia).unwrap();
        let local_end = window.end.with_timezone(&Apia);

        assert_eq!(local_end.date_naive(), date(2011, 12, 31));
        assert_eq!((local_end.hour(), local_end.minute()), (0, 0));
        assert_eq!(window.duration(), Duration::hours(24));
    }

    #[test]
    fn skipped_day_itself_is_unresolvable() {
        assert_eq!(
            DateWindow::for_day(date(2011, 12, 30), &Apia),
            Err(WindowError::UnresolvableDayStart(date(2011, 12, 30)))
        );
    }

    #[test]
    fn last_representable_day_is_rejected() {
        let result = DateWindow::for_day(NaiveDate::MAX, &Utc);
        assert_eq!(result, Err(WindowError::OutOfRange(NaiveDate::MAX)));
    }
}
