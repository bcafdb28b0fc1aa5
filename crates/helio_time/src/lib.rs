//! Time scales and epochs for solar coordinate transforms.
//!
//! This crate provides:
//! - Julian Date ↔ calendar conversions
//! - A built-in leap-second table, replaceable by a NAIF LSK text
//! - UTC → TAI → TT → TDB conversion chain (and inverse)
//! - An `Epoch` type for type-safe TDB epoch handling
//! - `parse_time` for ISO-8601 style UTC strings

pub mod error;
pub mod julian;
pub mod lsk;
pub mod scales;
pub mod utc_time;

use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::LazyLock;

pub use error::TimeError;
pub use julian::{
    calendar_to_jd, jd_to_calendar, jd_to_tdb_seconds, tdb_seconds_to_jd, DAYS_PER_JULIAN_CENTURY,
    J2000_JD, SECONDS_PER_DAY,
};
pub use lsk::{LeapSecond, LskData};
pub use utc_time::UtcTime;

static BUILTIN_KERNEL: LazyLock<LeapSecondKernel> = LazyLock::new(|| LeapSecondKernel {
    data: LskData::builtin(),
});

/// Leap-second and TDB model data, ready for time conversions.
#[derive(Debug, Clone)]
pub struct LeapSecondKernel {
    data: LskData,
}

impl LeapSecondKernel {
    /// The compiled-in table (leap seconds through 2017-Jan-01).
    pub fn builtin() -> &'static Self {
        &BUILTIN_KERNEL
    }

    /// Load an LSK file from a path.
    pub fn load(path: &Path) -> Result<Self, TimeError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse an LSK from its text content.
    pub fn parse(content: &str) -> Result<Self, TimeError> {
        Ok(Self {
            data: lsk::parse_lsk(content)?,
        })
    }

    pub fn data(&self) -> &LskData {
        &self.data
    }

    /// Convert UTC seconds past J2000 to TDB seconds past J2000.
    pub fn utc_to_tdb(&self, utc_s: f64) -> f64 {
        scales::utc_to_tdb(utc_s, &self.data)
    }

    /// Convert TDB seconds past J2000 to UTC seconds past J2000.
    pub fn tdb_to_utc(&self, tdb_s: f64) -> f64 {
        scales::tdb_to_utc(tdb_s, &self.data)
    }

    /// Parse a UTC string into an epoch using this kernel's leap seconds.
    pub fn parse_time(&self, input: &str) -> Result<Epoch, TimeError> {
        match input.trim() {
            "J2000" | "J2000.0" => Ok(Epoch::J2000),
            s => Ok(s.parse::<UtcTime>()?.to_epoch(self)),
        }
    }
}

/// Parse a UTC string (or `J2000`) into an epoch with the built-in leap seconds.
pub fn parse_time(input: &str) -> Result<Epoch, TimeError> {
    LeapSecondKernel::builtin().parse_time(input)
}

/// A TDB epoch represented as seconds past J2000.0.
///
/// Equality is exact; two epochs are "the same obstime" only when their
/// TDB seconds are bit-identical.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Epoch {
    tdb_seconds: f64,
}

impl Epoch {
    /// J2000.0.
    pub const J2000: Self = Self::from_tdb_seconds(0.0);

    /// Create an epoch from TDB seconds past J2000.0.
    pub const fn from_tdb_seconds(s: f64) -> Self {
        Self { tdb_seconds: s }
    }

    /// Create an epoch from a Julian Date in TDB.
    pub fn from_jd_tdb(jd: f64) -> Self {
        Self::from_tdb_seconds(jd_to_tdb_seconds(jd))
    }

    /// Create an epoch from UTC calendar fields with the built-in leap seconds.
    pub fn from_utc(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: f64) -> Self {
        UtcTime::new(year, month, day, hour, min, sec).to_epoch(LeapSecondKernel::builtin())
    }

    /// TDB seconds past J2000.0.
    pub fn as_tdb_seconds(self) -> f64 {
        self.tdb_seconds
    }

    /// Julian Date in TDB.
    pub fn as_jd_tdb(self) -> f64 {
        tdb_seconds_to_jd(self.tdb_seconds)
    }

    /// Julian centuries of TDB since J2000.0.
    pub fn julian_centuries(self) -> f64 {
        self.tdb_seconds / (SECONDS_PER_DAY * DAYS_PER_JULIAN_CENTURY)
    }

    /// The epoch `dt` seconds later.
    pub fn offset_seconds(self, dt: f64) -> Self {
        Self::from_tdb_seconds(self.tdb_seconds + dt)
    }

    /// Bit pattern, for use as a cache key.
    pub fn to_bits(self) -> u64 {
        self.tdb_seconds.to_bits()
    }

    /// UTC calendar fields with the built-in leap seconds.
    pub fn to_utc(self) -> UtcTime {
        UtcTime::from_epoch(self, LeapSecondKernel::builtin())
    }
}

impl Display for Epoch {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_utc())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_from_jd_roundtrip() {
        let jd = 2_460_000.5;
        let epoch = Epoch::from_jd_tdb(jd);
        assert!((epoch.as_jd_tdb() - jd).abs() < 1e-12);
    }

    #[test]
    fn epoch_j2000_is_zero() {
        assert_eq!(Epoch::from_jd_tdb(J2000_JD), Epoch::J2000);
        assert_eq!(Epoch::J2000.julian_centuries(), 0.0);
    }

    #[test]
    fn parse_time_2013() {
        let epoch = parse_time("2013-04-01T00:00:00").unwrap();
        // TDB - UTC = 35 + 32.184 + periodic term
        let utc_s = jd_to_tdb_seconds(calendar_to_jd(2013, 4, 1.0));
        let diff = epoch.as_tdb_seconds() - utc_s;
        assert!((diff - 67.184).abs() < 2e-3, "TDB - UTC = {diff}");
    }

    #[test]
    fn parse_time_j2000_literal() {
        assert_eq!(parse_time("J2000").unwrap(), Epoch::J2000);
    }

    #[test]
    fn parse_time_error() {
        assert!(matches!(parse_time("not a date"), Err(TimeError::InvalidDate(_))));
    }

    #[test]
    fn offset_and_ordering() {
        let t = Epoch::from_tdb_seconds(100.0);
        assert!(t.offset_seconds(0.5) > t);
        assert_eq!(t.offset_seconds(-100.0), Epoch::J2000);
    }

    #[test]
    fn display_goes_through_utc() {
        let t = Epoch::from_utc(2013, 4, 1, 0, 0, 0.0);
        assert_eq!(t.to_string(), "2013-04-01T00:00:00Z");
    }
}
