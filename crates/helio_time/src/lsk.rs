//! Leap-second and TDB model constants.
//!
//! The constants follow the NAIF leapseconds kernel (LSK) layout: the
//! `DELTET/*` variables drive the UTC → TAI → TT → TDB chain. A built-in
//! table covering every leap second through 2017-Jan-01 is always available;
//! a newer LSK text can replace it.
//!
//! Reference: NAIF Time Required Reading.

use std::collections::HashMap;

use crate::error::TimeError;
use crate::julian::{calendar_to_jd, jd_to_tdb_seconds, month_from_abbrev};

/// One step of the TAI − UTC staircase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeapSecond {
    /// TAI − UTC in seconds from this epoch onward.
    pub delta_at: f64,
    /// UTC seconds past J2000 at which the step takes effect.
    pub utc_seconds: f64,
}

/// Time-scale model constants.
#[derive(Debug, Clone, PartialEq)]
pub struct LskData {
    /// TT − TAI in seconds (DELTET/DELTA_T_A).
    pub delta_t_a: f64,
    /// Amplitude of the periodic TDB − TT term in seconds (DELTET/K).
    pub k: f64,
    /// Eccentricity used in the TDB − TT Kepler term (DELTET/EB).
    pub eb: f64,
    /// Mean anomaly at J2000 in radians (DELTET/M\[0\]).
    pub m0: f64,
    /// Mean anomaly rate in rad/s (DELTET/M\[1\]).
    pub m1: f64,
    /// Leap-second steps sorted by epoch.
    pub leap_seconds: Vec<LeapSecond>,
}

/// (TAI − UTC, year, month) for every step since 1972, all on the 1st.
const BUILTIN_STEPS: [(f64, i32, u32); 28] = [
    (10.0, 1972, 1),
    (11.0, 1972, 7),
    (12.0, 1973, 1),
    (13.0, 1974, 1),
    (14.0, 1975, 1),
    (15.0, 1976, 1),
    (16.0, 1977, 1),
    (17.0, 1978, 1),
    (18.0, 1979, 1),
    (19.0, 1980, 1),
    (20.0, 1981, 7),
    (21.0, 1982, 7),
    (22.0, 1983, 7),
    (23.0, 1985, 7),
    (24.0, 1988, 1),
    (25.0, 1990, 1),
    (26.0, 1991, 1),
    (27.0, 1992, 7),
    (28.0, 1993, 7),
    (29.0, 1994, 7),
    (30.0, 1996, 1),
    (31.0, 1997, 7),
    (32.0, 1999, 1),
    (33.0, 2006, 1),
    (34.0, 2009, 1),
    (35.0, 2012, 7),
    (36.0, 2015, 7),
    (37.0, 2017, 1),
];

impl LskData {
    /// Constants from `naif0012.tls`.
    pub fn builtin() -> Self {
        let leap_seconds = BUILTIN_STEPS
            .iter()
            .map(|&(delta_at, year, month)| LeapSecond {
                delta_at,
                utc_seconds: jd_to_tdb_seconds(calendar_to_jd(year, month, 1.0)),
            })
            .collect();
        Self {
            delta_t_a: 32.184,
            k: 1.657e-3,
            eb: 1.671e-2,
            m0: 6.239996,
            m1: 1.99096871e-7,
            leap_seconds,
        }
    }

    /// TAI − UTC at a UTC epoch (seconds past J2000).
    ///
    /// Epochs before 1972 use the first tabulated offset.
    pub fn delta_at(&self, utc_s: f64) -> f64 {
        let idx = self
            .leap_seconds
            .partition_point(|step| step.utc_seconds <= utc_s);
        match idx {
            0 => self.leap_seconds.first().map_or(0.0, |s| s.delta_at),
            i => self.leap_seconds[i - 1].delta_at,
        }
    }
}

/// Parse the `\begindata` sections of an LSK text.
pub fn parse_lsk(content: &str) -> Result<LskData, TimeError> {
    let pool = read_pool(content)?;

    let m = pool_values(&pool, "DELTET/M")?;
    if m.len() < 2 {
        return Err(TimeError::LskParse("DELTET/M needs 2 values".into()));
    }

    let steps = pool_values(&pool, "DELTET/DELTA_AT")?;
    if steps.len() % 2 != 0 {
        return Err(TimeError::LskParse(
            "DELTET/DELTA_AT must hold (offset, epoch) pairs".into(),
        ));
    }
    let mut leap_seconds: Vec<LeapSecond> = steps
        .chunks_exact(2)
        .map(|pair| LeapSecond {
            delta_at: pair[0],
            utc_seconds: pair[1],
        })
        .collect();
    leap_seconds.sort_by(|a, b| a.utc_seconds.total_cmp(&b.utc_seconds));

    Ok(LskData {
        delta_t_a: pool_scalar(&pool, "DELTET/DELTA_T_A")?,
        k: pool_scalar(&pool, "DELTET/K")?,
        eb: pool_scalar(&pool, "DELTET/EB")?,
        m0: m[0],
        m1: m[1],
        leap_seconds,
    })
}

type KernelPool = HashMap<String, Vec<f64>>;

/// Collect `NAME = value` and `NAME = ( v1 v2 ... )` assignments.
fn read_pool(content: &str) -> Result<KernelPool, TimeError> {
    let mut data = String::new();
    let mut in_data = false;
    for line in content.lines() {
        match line.trim() {
            t if t.eq_ignore_ascii_case("\\begindata") => in_data = true,
            t if t.eq_ignore_ascii_case("\\begintext") => in_data = false,
            t if in_data => {
                data.push_str(t);
                data.push(' ');
            }
            _ => {}
        }
    }
    if data.trim().is_empty() {
        return Err(TimeError::LskParse("no \\begindata section found".into()));
    }

    // Pad the delimiters so a whitespace split yields clean tokens.
    let spaced = data
        .replace('(', " ( ")
        .replace(')', " ) ")
        .replace('=', " = ")
        .replace(',', " ");
    let tokens: Vec<&str> = spaced.split_whitespace().collect();

    let mut pool = KernelPool::new();
    let mut i = 0;
    while i < tokens.len() {
        let name = tokens[i];
        if tokens.get(i + 1) != Some(&"=") {
            return Err(TimeError::LskParse(format!("expected '=' after {name}")));
        }
        i += 2;
        let mut values = Vec::new();
        if tokens.get(i) == Some(&"(") {
            i += 1;
            while let Some(&tok) = tokens.get(i) {
                i += 1;
                if tok == ")" {
                    break;
                }
                values.push(parse_value(tok)?);
            }
        } else if let Some(&tok) = tokens.get(i) {
            values.push(parse_value(tok)?);
            i += 1;
        }
        pool.insert(name.to_string(), values);
    }
    Ok(pool)
}

/// A number (Fortran `D` exponents allowed) or an `@YYYY-MON-DD` date.
fn parse_value(token: &str) -> Result<f64, TimeError> {
    if let Some(date) = token.strip_prefix('@') {
        return parse_naif_date(date);
    }
    token
        .replace(['D', 'd'], "E")
        .parse()
        .map_err(|e| TimeError::LskParse(format!("cannot parse '{token}': {e}")))
}

/// `1972-JAN-1` → seconds past J2000 (UTC).
fn parse_naif_date(s: &str) -> Result<f64, TimeError> {
    let bad = || TimeError::LskParse(format!("bad date literal @{s}"));
    let mut parts = s.split('-');
    let year: i32 = parts.next().and_then(|p| p.parse().ok()).ok_or_else(bad)?;
    let month = parts.next().and_then(month_from_abbrev).ok_or_else(bad)?;
    let day: f64 = parts.next().and_then(|p| p.parse().ok()).ok_or_else(bad)?;
    if parts.next().is_some() {
        return Err(bad());
    }
    Ok(jd_to_tdb_seconds(calendar_to_jd(year, month, day)))
}

fn pool_values<'a>(pool: &'a KernelPool, name: &str) -> Result<&'a [f64], TimeError> {
    pool.get(name)
        .map(Vec::as_slice)
        .ok_or_else(|| TimeError::LskParse(format!("missing {name}")))
}

fn pool_scalar(pool: &KernelPool, name: &str) -> Result<f64, TimeError> {
    pool_values(pool, name)?
        .first()
        .copied()
        .ok_or_else(|| TimeError::LskParse(format!("{name} has no values")))
}
