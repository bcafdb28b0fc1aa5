//! Bodies known to the ephemeris.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::error::EphemerisError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Body {
    Sun,
    Mercury,
    Venus,
    Earth,
    Moon,
    EarthMoonBarycenter,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
}

impl Body {
    pub const ALL: [Self; 11] = [
        Self::Sun,
        Self::Mercury,
        Self::Venus,
        Self::Earth,
        Self::Moon,
        Self::EarthMoonBarycenter,
        Self::Mars,
        Self::Jupiter,
        Self::Saturn,
        Self::Uranus,
        Self::Neptune,
    ];

    /// NAIF body code. Outer planets use their system barycentres.
    pub const fn code(self) -> i32 {
        match self {
            Self::Sun => 10,
            Self::Mercury => 199,
            Self::Venus => 299,
            Self::Earth => 399,
            Self::Moon => 301,
            Self::EarthMoonBarycenter => 3,
            Self::Mars => 4,
            Self::Jupiter => 5,
            Self::Saturn => 6,
            Self::Uranus => 7,
            Self::Neptune => 8,
        }
    }

    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            10 => Some(Self::Sun),
            199 | 1 => Some(Self::Mercury),
            299 | 2 => Some(Self::Venus),
            399 => Some(Self::Earth),
            301 => Some(Self::Moon),
            3 => Some(Self::EarthMoonBarycenter),
            4 | 499 => Some(Self::Mars),
            5 | 599 => Some(Self::Jupiter),
            6 | 699 => Some(Self::Saturn),
            7 | 799 => Some(Self::Uranus),
            8 | 899 => Some(Self::Neptune),
            _ => None,
        }
    }

    /// Lower-case name as used in frame attributes ("sun", "earth", ...).
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sun => "sun",
            Self::Mercury => "mercury",
            Self::Venus => "venus",
            Self::Earth => "earth",
            Self::Moon => "moon",
            Self::EarthMoonBarycenter => "earth-moon-barycenter",
            Self::Mars => "mars",
            Self::Jupiter => "jupiter",
            Self::Saturn => "saturn",
            Self::Uranus => "uranus",
            Self::Neptune => "neptune",
        }
    }
}

impl Display for Body {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Case-insensitive; `emb` is accepted for the Earth-Moon barycentre.
impl FromStr for Body {
    type Err = EphemerisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "emb" {
            return Ok(Self::EarthMoonBarycenter);
        }
        Self::ALL
            .into_iter()
            .find(|b| b.name() == lower)
            .ok_or_else(|| EphemerisError::UnknownBody(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_roundtrip() {
        for body in Body::ALL {
            assert_eq!(Body::from_code(body.code()), Some(body), "{body}");
        }
        assert_eq!(Body::from_code(-42), None);
    }

    #[test]
    fn names_parse_case_insensitively() {
        assert_eq!("Earth".parse::<Body>().unwrap(), Body::Earth);
        assert_eq!("SUN".parse::<Body>().unwrap(), Body::Sun);
        assert_eq!("emb".parse::<Body>().unwrap(), Body::EarthMoonBarycenter);
        assert!(matches!("pluto".parse::<Body>(), Err(EphemerisError::UnknownBody(_))));
    }
}
