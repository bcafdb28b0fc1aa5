//! Observer locations for observer-dependent frames, observer equality,
//! and token resolution.

use std::fmt::{self, Display, Formatter};

use helio_frames::vector::{broadcast_get, broadcast_len};
use helio_frames::SphericalCoords;

use crate::coordinate::Coordinate;
use crate::data::CoordData;
use crate::error::TransformError;
use crate::frame::{obstimes_match, Frame, FrameKind, ObsTime};
use crate::graph::TransformGraph;
use crate::sun;

/// Token naming the Earth.
pub const EARTH: &str = "earth";
/// Token naming the Sun's centre.
pub const SUN: &str = "sun";

/// Absolute slack on observer angles, so longitudes at exactly zero can
/// still compare equal.
const ANGLE_ATOL_DEG: f64 = 1e-9;

/// Where an observer-dependent frame is viewed from.
#[derive(Debug, Clone, PartialEq)]
pub enum Observer {
    /// A named location, resolved later against the ephemeris.
    Token(String),
    /// A heliographic Stonyhurst position.
    Resolved(Box<Coordinate>),
}

impl Observer {
    pub fn earth() -> Self {
        Self::Token(EARTH.to_string())
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::Token(name.into())
    }

    /// Observer at `coord`, which must be in heliographic Stonyhurst.
    pub fn at(coord: Coordinate) -> Result<Self, TransformError> {
        if coord.kind() != FrameKind::HeliographicStonyhurst {
            return Err(TransformError::InvalidObserver(coord.kind()));
        }
        Ok(Self::Resolved(Box::new(coord)))
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Token(name) => Some(name),
            Self::Resolved(_) => None,
        }
    }

    pub fn coordinate(&self) -> Option<&Coordinate> {
        match self {
            Self::Token(_) => None,
            Self::Resolved(coord) => Some(coord),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

impl Display for Observer {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token(name) => f.write_str(name),
            Self::Resolved(coord) => match coord.spherical().as_slice() {
                [s] => write!(
                    f,
                    "<{} lon={:.6} lat={:.6} radius={:.3} km>",
                    coord.kind(),
                    s.lon_deg,
                    s.lat_deg,
                    s.distance_km
                ),
                many => write!(f, "<{} x{}>", coord.kind(), many.len()),
            },
        }
    }
}

/// Compare two observers.
///
/// With `allow_token`, identical tokens (or two absent observers) are
/// equal. Otherwise both must be resolved: they are equal when latitude,
/// longitude and radius agree within relative tolerance `rtol` and the
/// obstimes are exactly equal, elementwise for batches.
pub fn observers_equal(
    a: Option<&Observer>,
    b: Option<&Observer>,
    allow_token: bool,
    rtol: f64,
) -> Result<bool, TransformError> {
    if allow_token && a == b {
        return Ok(true);
    }
    let (Some(Observer::Resolved(left)), Some(Observer::Resolved(right))) = (a, b) else {
        return Err(TransformError::IncompatibleObserver {
            left: describe(a),
            right: describe(b),
        });
    };
    Ok(positions_close(&left.spherical(), &right.spherical(), rtol)
        && obstimes_match(left.obstime(), right.obstime()))
}

fn describe(observer: Option<&Observer>) -> String {
    observer.map_or_else(|| "None".to_string(), Observer::to_string)
}

fn positions_close(a: &[SphericalCoords], b: &[SphericalCoords], rtol: f64) -> bool {
    let close = |x: f64, y: f64, atol: f64| (x - y).abs() <= atol + rtol * y.abs();
    let Some(n) = broadcast_len(a.len(), b.len()) else {
        return false;
    };
    (0..n).all(|i| {
        let (p, q) = (broadcast_get(a, i), broadcast_get(b, i));
        close(p.lat_deg, q.lat_deg, ANGLE_ATOL_DEG)
            && close(p.lon_deg, q.lon_deg, ANGLE_ATOL_DEG)
            && close(p.distance_km, q.distance_km, 0.0)
    })
}

/// Resolve a token observer to its heliographic Stonyhurst position at
/// `obstime`. Resolved observers are returned unchanged.
///
/// `"earth"` uses the graph's ephemeris; `"sun"` is the HGS origin.
pub fn resolve_observer(
    graph: &TransformGraph,
    observer: &Observer,
    obstime: Option<&ObsTime>,
) -> Result<Observer, TransformError> {
    let Observer::Token(name) = observer else {
        return Ok(observer.clone());
    };
    let missing_obstime = || TransformError::MissingAttribute {
        frame: FrameKind::HeliographicStonyhurst,
        attribute: "obstime",
    };
    let coord = if name.eq_ignore_ascii_case(EARTH) {
        let obstime = obstime.ok_or_else(missing_obstime)?;
        sun::get_earth(graph, obstime)?
    } else if name.eq_ignore_ascii_case(SUN) {
        let obstime = obstime.ok_or_else(missing_obstime)?;
        let frame = Frame::at(FrameKind::HeliographicStonyhurst, obstime.clone())?;
        Coordinate::new(frame, CoordData::cartesian(vec![[0.0; 3]])?)?
    } else {
        return Err(TransformError::UnknownObserver(name.clone()));
    };
    Ok(Observer::Resolved(Box::new(coord)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use helio_time::Epoch;

    fn hgs(lon: f64, lat: f64, r: f64, t: f64) -> Observer {
        let frame = Frame::at(
            FrameKind::HeliographicStonyhurst,
            Epoch::from_tdb_seconds(t),
        )
        .unwrap();
        Observer::at(Coordinate::from_spherical(frame, lon, lat, r).unwrap()).unwrap()
    }

    #[test]
    fn tokens_equal_only_when_allowed() {
        let e = Observer::earth();
        assert!(observers_equal(Some(&e), Some(&e), true, 1e-5).unwrap());
        assert!(observers_equal(None, None, true, 1e-5).unwrap());
        let err = observers_equal(Some(&e), Some(&e), false, 1e-5).unwrap_err();
        assert!(matches!(err, TransformError::IncompatibleObserver { .. }));
    }

    #[test]
    fn token_against_resolved_is_incompatible() {
        let e = Observer::earth();
        let r = hgs(0.0, 7.0, 1.5e8, 0.0);
        let err = observers_equal(Some(&e), Some(&r), true, 1e-5).unwrap_err();
        assert_eq!(
            err,
            TransformError::IncompatibleObserver {
                left: "earth".into(),
                right: r.to_string()
            }
        );
    }

    #[test]
    fn resolved_compare_with_tolerance_and_exact_time() {
        let a = hgs(0.0, 7.0, 1.5e8, 0.0);
        let b = hgs(1e-12, 7.0 * (1.0 + 1e-7), 1.5e8 * (1.0 + 1e-7), 0.0);
        let far = hgs(0.0, 7.0, 1.6e8, 0.0);
        let later = hgs(0.0, 7.0, 1.5e8, 1e-3);
        assert!(observers_equal(Some(&a), Some(&b), false, 1e-5).unwrap());
        assert!(!observers_equal(Some(&a), Some(&far), false, 1e-5).unwrap());
        assert!(!observers_equal(Some(&a), Some(&later), false, 1e-5).unwrap());
    }

    #[test]
    fn observer_must_be_stonyhurst() {
        let frame = Frame::at(FrameKind::HeliographicCarrington, Epoch::J2000).unwrap();
        let coord = Coordinate::from_spherical(frame, 0.0, 0.0, 1.0).unwrap();
        assert_eq!(
            Observer::at(coord).unwrap_err(),
            TransformError::InvalidObserver(FrameKind::HeliographicCarrington)
        );
    }
}
