//! Solar orientation: rotation pole, Carrington longitude, B0, and the
//! Earth's heliographic position.
//!
//! Pole orientation from Archinal et al. (2011), "Report of the IAU
//! Working Group on Cartographic Coordinates and Rotational Elements:
//! 2009": RA 286.13°, Dec 63.87°, taken as constant in time. The
//! Carrington prime meridian uses W0 = 84.176° at J2000 and the sidereal
//! rate 14.1844°/day, evaluated at the time light left the Sun.

use std::sync::LazyLock;

use helio_frames::vector::{mat_vec, norm};
use helio_frames::{
    cartesian_to_spherical, unit_vector, vector_to_vector_matrix, Mat3, SphericalCoords, Vec3,
    Z_AXIS,
};
use helio_time::{Epoch, J2000_JD, SECONDS_PER_DAY};

use crate::context::TransformContext;
use crate::coordinate::Coordinate;
use crate::data::CoordData;
use crate::error::TransformError;
use crate::frame::{Frame, FrameKind, ObsTime};
use crate::graph::TransformGraph;

/// Nominal solar radius (IAU 2015 Resolution B3), km.
pub const RSUN_KM: f64 = 695_700.0;

pub const SOLAR_POLE_RA_DEG: f64 = 286.13;
pub const SOLAR_POLE_DEC_DEG: f64 = 63.87;

/// Carrington prime meridian at J2000 (degrees east of the ascending node).
pub const CARRINGTON_W0_DEG: f64 = 84.176;
/// Sidereal rotation rate (deg/day).
pub const SIDEREAL_ROTATION_DEG_PER_DAY: f64 = 14.1844;

pub const SPEED_OF_LIGHT_KM_S: f64 = 299_792.458;

static DETILT: LazyLock<Mat3> =
    LazyLock::new(|| vector_to_vector_matrix(&solar_pole(), &Z_AXIS));

/// Unit vector of the solar rotation pole in ICRS/HCRS axes.
pub fn solar_pole() -> Vec3 {
    unit_vector(SOLAR_POLE_RA_DEG, SOLAR_POLE_DEC_DEG)
}

/// Rotation taking the solar pole onto +Z.
pub fn detilt_matrix() -> &'static Mat3 {
    &DETILT
}

fn detilted_longitude_deg(v: &Vec3) -> f64 {
    cartesian_to_spherical(&mat_vec(detilt_matrix(), v)).lon_deg
}

pub(crate) fn carrington_longitude_in(
    ctx: &mut TransformContext<'_>,
    epoch: Epoch,
) -> Result<f64, TransformError> {
    let sun_earth = ctx.sun_earth_at(epoch)?;
    let light_time_days = norm(&sun_earth) / SPEED_OF_LIGHT_KM_S / SECONDS_PER_DAY;
    let days = epoch.as_jd_tdb() - J2000_JD - light_time_days;

    // The ascending node of the solar equator on the ICRS equator.
    let node = unit_vector(SOLAR_POLE_RA_DEG + 90.0, 0.0);
    let prime_meridian =
        detilted_longitude_deg(&node) + CARRINGTON_W0_DEG + SIDEREAL_ROTATION_DEG_PER_DAY * days;

    Ok((detilted_longitude_deg(&sun_earth) - prime_meridian).rem_euclid(360.0))
}

pub(crate) fn carrington_longitudes_in(
    ctx: &mut TransformContext<'_>,
    obstime: &ObsTime,
) -> Result<Vec<f64>, TransformError> {
    obstime
        .epochs()
        .iter()
        .map(|&e| carrington_longitude_in(ctx, e))
        .collect()
}

/// Carrington longitude of the sub-Earth point (L0), degrees in `[0, 360)`.
pub fn carrington_longitude(graph: &TransformGraph, epoch: Epoch) -> Result<f64, TransformError> {
    carrington_longitude_in(&mut graph.context(), epoch)
}

/// Earth as a heliographic Stonyhurst coordinate at every epoch of
/// `obstime`. Longitude is exactly zero by construction of the frame.
pub fn get_earth(graph: &TransformGraph, obstime: &ObsTime) -> Result<Coordinate, TransformError> {
    let mut ctx = graph.context();
    let sun_earth = ctx.sun_earth(obstime)?;
    let hcrs_frame = Frame::at(FrameKind::Hcrs, obstime.clone())?;
    let hcrs = Coordinate::new(hcrs_frame, CoordData::cartesian(sun_earth)?)?;
    let hgs_frame = Frame::at(FrameKind::HeliographicStonyhurst, obstime.clone())?;
    let hgs = ctx.transform(&hcrs, &hgs_frame)?;

    // Remove round-off in the longitude.
    let points: Vec<_> = hgs
        .spherical()
        .into_iter()
        .map(|s| SphericalCoords::new(0.0, s.lat_deg, s.distance_km))
        .collect();
    Coordinate::new(hgs_frame, CoordData::from_spherical(&points)?)
}

/// Heliographic latitude of the Earth (B0), degrees.
pub fn b0(graph: &TransformGraph, epoch: Epoch) -> Result<f64, TransformError> {
    let earth = get_earth(graph, &ObsTime::from(epoch))?;
    Ok(earth.spherical()[0].lat_deg)
}

/// Sun–Earth distance, km.
pub fn earth_distance(graph: &TransformGraph, epoch: Epoch) -> Result<f64, TransformError> {
    let mut ctx = graph.context();
    Ok(norm(&ctx.sun_earth_at(epoch)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use helio_frames::vector::orthonormality_error;

    #[test]
    fn detilt_maps_pole_to_z() {
        let z = mat_vec(detilt_matrix(), &solar_pole());
        assert!(z[0].abs() < 1e-15 && z[1].abs() < 1e-15);
        assert!((z[2] - 1.0).abs() < 1e-15);
        assert!(orthonormality_error(detilt_matrix()) < 1e-12);
    }

    #[test]
    fn pole_tilt_to_ecliptic_is_about_seven_degrees() {
        // The solar equator is inclined 7.25° to the ecliptic.
        let ecliptic_pole = [0.0, -helio_frames::SIN_OBL, helio_frames::COS_OBL];
        let cos = helio_frames::vector::dot(&solar_pole(), &ecliptic_pole);
        let tilt = cos.acos().to_degrees();
        assert!((tilt - 7.25).abs() < 0.005, "tilt = {tilt}");
    }
}
