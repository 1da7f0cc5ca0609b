use std::fmt;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Local, NaiveDate, Utc};
use chrono_tz::Tz;

use super::DateWindow;
use crate::error::WindowError;

/// Zone used to decide where calendar days begin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayZone {
    #[default]
    Local,
    Named(Tz),
}

impl DayZone {
    /// `None` selects the process-local zone; otherwise an IANA name such as
    /// `America/New_York`.
    pub fn from_setting(name: Option<&str>) -> Result<Self> {
        match name.map(str::trim).filter(|value| !value.is_empty()) {
            None => Ok(DayZone::Local),
            Some(value) => value
                .parse::<Tz>()
                .map(DayZone::Named)
                .map_err(|err| anyhow!("unknown time zone '{value}': {err}")),
        }
    }

    pub fn window_containing(&self, instant: DateTime<Utc>) -> Result<DateWindow, WindowError> {
        match self {
            DayZone::Local => DateWindow::containing(instant, &Local),
            DayZone::Named(tz) => DateWindow::containing(instant, tz),
        }
    }

    pub fn window_for_day(&self, day: NaiveDate) -> Result<DateWindow, WindowError> {
        match self {
            DayZone::Local => DateWindow::for_day(day, &Local),
            DayZone::Named(tz) => DateWindow::for_day(day, tz),
        }
    }
}

impl fmt::Display for DayZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayZone::Local => f.write_str("local"),
            DayZone::Named(tz) => f.write_str(tz.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn empty_setting_means_local() {
        assert_eq!(DayZone::from_setting(None).unwrap(), DayZone::Local);
        assert_eq!(DayZone::from_setting(Some("  ")).unwrap(), DayZone::Local);
    }

    #[test]
    fn parses_iana_names() {
        let zone = DayZone::from_setting(Some("America/New_York")).unwrap();
        assert_eq!(zone, DayZone::Named(chrono_tz::America::New_York));
        assert_eq!(zone.to_string(), "America/New_York");
    }

    #[test]
    fn rejects_unknown_names() {
        assert!(DayZone::from_setting(Some("Mars/Olympus_Mons")).is_err());
    }

    #[test]
    fn named_zone_applies_calendar_rules() {
        let zone = DayZone::Named(chrono_tz::America::New_York);
        let day = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let window = zone.window_for_day(day).unwrap();
        assert_eq!(window.duration(), Duration::hours(23));

        let noon = window.start + Duration::hours(12);
        assert_eq!(zone.window_containing(noon).unwrap(), window);
    }
}
