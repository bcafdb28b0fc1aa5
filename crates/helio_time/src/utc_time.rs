//! UTC calendar date/time with sub-second precision.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::error::TimeError;
use crate::julian::{
    calendar_to_jd, days_in_month, jd_to_calendar, jd_to_tdb_seconds, J2000_JD, SECONDS_PER_DAY,
};
use crate::{Epoch, LeapSecondKernel};

/// UTC calendar date with sub-second precision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UtcTime {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: f64,
}

impl UtcTime {
    pub fn new(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: f64) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// Check calendar and clock fields. A 60th second is allowed for leap seconds.
    pub fn validate(&self) -> Result<(), TimeError> {
        if !(1..=12).contains(&self.month) {
            return Err(TimeError::InvalidDate(format!("month {} out of range", self.month)));
        }
        if self.day == 0 || self.day > days_in_month(self.year, self.month) {
            return Err(TimeError::InvalidDate(format!(
                "day {} out of range for {:04}-{:02}",
                self.day, self.year, self.month
            )));
        }
        if self.hour > 23 || self.minute > 59 || !(0.0..61.0).contains(&self.second) {
            return Err(TimeError::InvalidDate(format!(
                "time {:02}:{:02}:{} out of range",
                self.hour, self.minute, self.second
            )));
        }
        Ok(())
    }

    /// UTC seconds past J2000 (leap seconds not counted).
    fn utc_seconds(&self) -> f64 {
        let day_frac = f64::from(self.day)
            + f64::from(self.hour) / 24.0
            + f64::from(self.minute) / 1440.0
            + self.second / 86_400.0;
        jd_to_tdb_seconds(calendar_to_jd(self.year, self.month, day_frac))
    }

    /// Convert to a TDB epoch.
    pub fn to_epoch(&self, lsk: &LeapSecondKernel) -> Epoch {
        Epoch::from_tdb_seconds(lsk.utc_to_tdb(self.utc_seconds()))
    }

    /// Convert to Julian Date TDB.
    pub fn to_jd_tdb(&self, lsk: &LeapSecondKernel) -> f64 {
        self.to_epoch(lsk).as_jd_tdb()
    }

    /// Convert a TDB epoch back to UTC calendar fields, rounded to the microsecond.
    pub fn from_epoch(epoch: Epoch, lsk: &LeapSecondKernel) -> Self {
        // J2000 is at noon; count whole days from the preceding midnight.
        let since_midnight = lsk.tdb_to_utc(epoch.as_tdb_seconds()) + SECONDS_PER_DAY / 2.0;
        let mut days = (since_midnight / SECONDS_PER_DAY).floor();
        let mut sec_of_day = ((since_midnight - days * SECONDS_PER_DAY) * 1e6).round() / 1e6;
        if sec_of_day >= SECONDS_PER_DAY {
            days += 1.0;
            sec_of_day -= SECONDS_PER_DAY;
        }
        let (year, month, day_frac) = jd_to_calendar(J2000_JD - 0.5 + days);
        let hour = (sec_of_day / 3600.0).floor() as u32;
        let minute = ((sec_of_day % 3600.0) / 60.0).floor() as u32;
        Self {
            year,
            month,
            day: day_frac.round() as u32,
            hour,
            minute,
            second: sec_of_day % 60.0,
        }
    }
}

impl Display for UtcTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let whole = self.second as u32;
        let frac = self.second - f64::from(whole);
        if frac.abs() < 1e-6 {
            write!(
                f,
                "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
                self.year, self.month, self.day, self.hour, self.minute, whole
            )
        } else {
            write!(
                f,
                "{:04}-{:02}-{:02}T{:02}:{:02}:{:09.6}Z",
                self.year, self.month, self.day, self.hour, self.minute, self.second
            )
        }
    }
}

/// Accepts `YYYY-MM-DD`, optionally followed by `T` or a space and
/// `hh:mm`, `hh:mm:ss` or `hh:mm:ss.fff`, with an optional trailing `Z`.
/// `/` is accepted as the date separator.
impl FromStr for UtcTime {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || TimeError::InvalidDate(s.to_string());
        let trimmed = s.trim().trim_end_matches('Z');
        let (date, time) = match trimmed.split_once(['T', ' ']) {
            Some((d, t)) => (d, Some(t.trim())),
            None => (trimmed, None),
        };

        let mut date_parts = date.split(['-', '/']);
        let year: i32 = date_parts.next().and_then(|p| p.parse().ok()).ok_or_else(bad)?;
        let month: u32 = date_parts.next().and_then(|p| p.parse().ok()).ok_or_else(bad)?;
        let day: u32 = date_parts.next().and_then(|p| p.parse().ok()).ok_or_else(bad)?;
        if date_parts.next().is_some() {
            return Err(bad());
        }

        let (hour, minute, second) = match time {
            None => (0, 0, 0.0),
            Some(t) => {
                let mut clock = t.split(':');
                let hour: u32 = clock.next().and_then(|p| p.parse().ok()).ok_or_else(bad)?;
                let minute: u32 = clock.next().and_then(|p| p.parse().ok()).ok_or_else(bad)?;
                let second: f64 = match clock.next() {
                    Some(p) => p.parse().map_err(|_| bad())?,
                    None => 0.0,
                };
                if clock.next().is_some() {
                    return Err(bad());
                }
                (hour, minute, second)
            }
        };

        let utc = Self::new(year, month, day, hour, minute, second);
        utc.validate()?;
        Ok(utc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_whole_seconds() {
        let t = UtcTime::new(2024, 1, 15, 0, 0, 0.0);
        assert_eq!(t.to_string(), "2024-01-15T00:00:00Z");
    }

    #[test]
    fn display_fractional_seconds() {
        let t = UtcTime::new(2024, 1, 15, 12, 30, 45.123);
        assert_eq!(t.to_string(), "2024-01-15T12:30:45.123000Z");
    }

    #[test]
    fn parse_date_only() {
        let t: UtcTime = "2013-04-01".parse().unwrap();
        assert_eq!(t, UtcTime::new(2013, 4, 1, 0, 0, 0.0));
    }

    #[test]
    fn parse_full_iso() {
        let t: UtcTime = "1992-10-13T12:30:15.5Z".parse().unwrap();
        assert_eq!((t.year, t.month, t.day, t.hour, t.minute), (1992, 10, 13, 12, 30));
        assert!((t.second - 15.5).abs() < 1e-12);
    }

    #[test]
    fn parse_space_separator_and_minutes() {
        let t: UtcTime = "2013/09/01 06:45".parse().unwrap();
        assert_eq!(t, UtcTime::new(2013, 9, 1, 6, 45, 0.0));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("2013-02-30".parse::<UtcTime>().is_err());
        assert!("2013-04".parse::<UtcTime>().is_err());
        assert!("2013-04-01T25:00".parse::<UtcTime>().is_err());
        assert!("yesterday".parse::<UtcTime>().is_err());
    }

    #[test]
    fn epoch_roundtrip() {
        let lsk = LeapSecondKernel::builtin();
        let t = UtcTime::new(2013, 4, 1, 12, 0, 30.0);
        let back = UtcTime::from_epoch(t.to_epoch(lsk), lsk);
        assert_eq!((back.year, back.month, back.day, back.hour, back.minute), (2013, 4, 1, 12, 0));
        assert!((back.second - 30.0).abs() < 1e-4, "second = {}", back.second);
    }
}
