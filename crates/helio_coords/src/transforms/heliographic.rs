//! HCRS ↔ heliographic Stonyhurst and Stonyhurst ↔ Carrington.

use helio_frames::vector::{broadcast_get, broadcast_len, mat_mul, mat_vec, sub, transpose};
use helio_frames::{axis_angle_matrix, xz_plane_matrix, Axis, Mat3, Vec3};

use crate::context::TransformContext;
use crate::coordinate::Coordinate;
use crate::error::TransformError;
use crate::frame::{obstimes_match, Frame, FrameKind, ObsTime};
use crate::graph::AffineParts;
use crate::loopback::retime;
use crate::sun::{carrington_longitudes_in, detilt_matrix};
use crate::transforms::builtin::sun_barycentric;

/// HCRS → HGS rotation at each epoch: de-tilt the solar pole onto +Z,
/// then turn about Z until the Sun–Earth vector lies in the XZ plane.
fn hcrs_to_hgs_matrices(
    ctx: &mut TransformContext<'_>,
    obstime: &ObsTime,
) -> Result<Vec<Mat3>, TransformError> {
    let detilt = detilt_matrix();
    Ok(ctx
        .sun_earth(obstime)?
        .iter()
        .map(|se| mat_mul(&xz_plane_matrix(&mat_vec(detilt, se)), detilt))
        .collect())
}

pub(crate) fn hcrs_to_hgs(
    ctx: &mut TransformContext<'_>,
    from: &Frame,
    to: &Frame,
    with_velocities: bool,
) -> Result<AffineParts, TransformError> {
    let hgs_time = to.require_obstime()?;
    let hcrs_time = from.require_obstime()?;
    let matrices = hcrs_to_hgs_matrices(ctx, hgs_time)?;
    let rotate = |vs: &[Vec3]| -> Result<Vec<Vec3>, TransformError> {
        let n = broadcast_len(matrices.len(), vs.len()).ok_or(TransformError::ShapeMismatch {
            expected: matrices.len(),
            found: vs.len(),
        })?;
        Ok((0..n)
            .map(|i| mat_vec(broadcast_get(&matrices, i), broadcast_get(vs, i)))
            .collect())
    };

    // The HCRS origin is the Sun at the HCRS obstime; HGS is centred on
    // the Sun at the HGS obstime.
    let offsets = if hcrs_time.matches(hgs_time) {
        None
    } else {
        let (old, _) = sun_barycentric(ctx, hcrs_time, false)?;
        let (new, _) = sun_barycentric(ctx, hgs_time, false)?;
        let n = broadcast_len(old.len(), new.len()).ok_or(TransformError::ShapeMismatch {
            expected: new.len(),
            found: old.len(),
        })?;
        let shift: Vec<Vec3> = (0..n)
            .map(|i| sub(broadcast_get(&old, i), broadcast_get(&new, i)))
            .collect();
        Some(rotate(&shift)?)
    };
    let offset_velocities = if with_velocities {
        Some(rotate(&ctx.sun_minus_earth_velocity(hgs_time)?)?)
    } else {
        None
    };

    Ok(AffineParts {
        matrices,
        offsets,
        offset_velocities,
    })
}

pub(crate) fn hgs_to_hcrs(
    ctx: &mut TransformContext<'_>,
    from: &Frame,
    to: &Frame,
    with_velocities: bool,
) -> Result<AffineParts, TransformError> {
    Ok(hcrs_to_hgs(ctx, to, from, with_velocities)?.inverse())
}

/// HGS → HGC at each epoch: a turn of −L0 about the solar pole.
fn hgs_to_hgc_matrices(
    ctx: &mut TransformContext<'_>,
    obstime: &ObsTime,
) -> Result<Vec<Mat3>, TransformError> {
    Ok(carrington_longitudes_in(ctx, obstime)?
        .into_iter()
        .map(|l0| axis_angle_matrix(-l0.to_radians(), Axis::Z))
        .collect())
}

pub(crate) fn hgs_to_hgc(
    ctx: &mut TransformContext<'_>,
    coord: &Coordinate,
    to: &Frame,
) -> Result<Coordinate, TransformError> {
    let int = retime(ctx, coord, to.obstime())?;
    let matrices = hgs_to_hgc_matrices(ctx, int.frame().require_obstime()?)?;
    Coordinate::realize(to, int.data().rotated(&matrices)?)
}

pub(crate) fn hgc_to_hgs(
    ctx: &mut TransformContext<'_>,
    coord: &Coordinate,
    to: &Frame,
) -> Result<Coordinate, TransformError> {
    let int = retime(ctx, coord, to.obstime())?;
    let matrices: Vec<Mat3> = hgs_to_hgc_matrices(ctx, int.frame().require_obstime()?)?
        .iter()
        .map(transpose)
        .collect();
    Coordinate::realize(to, int.data().rotated(&matrices)?)
}

/// HGS at one obstime to another, through HCRS at the source obstime.
pub(crate) fn hgs_to_hgs(
    ctx: &mut TransformContext<'_>,
    coord: &Coordinate,
    to: &Frame,
) -> Result<Coordinate, TransformError> {
    if obstimes_match(coord.obstime(), to.obstime()) {
        return Coordinate::realize(to, coord.data().clone());
    }
    let hcrs = Frame::new(FrameKind::Hcrs).replicate_obstime(coord.obstime().cloned());
    let int = ctx.transform(coord, &hcrs)?;
    ctx.transform(&int, to)
}

/// HGC at one obstime to another, through HGS at the source obstime.
pub(crate) fn hgc_to_hgc(
    ctx: &mut TransformContext<'_>,
    coord: &Coordinate,
    to: &Frame,
) -> Result<Coordinate, TransformError> {
    if obstimes_match(coord.obstime(), to.obstime()) {
        return Coordinate::realize(to, coord.data().clone());
    }
    let hgs = Frame::new(FrameKind::HeliographicStonyhurst)
        .replicate_obstime(coord.obstime().cloned());
    let int = ctx.transform(coord, &hgs)?;
    ctx.transform(&int, to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{TransformConfig, TransformGraph};
    use helio_ephem::EphemerisConfig;
    use helio_time::Epoch;

    const EPS: f64 = 1e-9;

    fn graph() -> TransformGraph {
        TransformGraph::analytic(EphemerisConfig::default(), TransformConfig::default()).unwrap()
    }

    #[test]
    fn hgs_matrices_are_rotations() {
        let g = graph();
        let mut ctx = g.context();
        let t = ObsTime::new(vec![Epoch::J2000, Epoch::from_utc(2013, 6, 1, 0, 0, 0.0)]).unwrap();
        for m in hcrs_to_hgs_matrices(&mut ctx, &t).unwrap() {
            assert!(helio_frames::vector::orthonormality_error(&m) < 1e-12);
            assert!((helio_frames::vector::determinant(&m) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn earth_lies_on_hgs_prime_meridian() {
        let g = graph();
        let t = Epoch::from_utc(2013, 9, 1, 0, 0, 0.0);
        let mut ctx = g.context();
        let se = ctx.sun_earth_at(t).unwrap();
        let hcrs = Coordinate::from_cartesian(Frame::at(FrameKind::Hcrs, t).unwrap(), se).unwrap();
        let hgs = ctx
            .transform(&hcrs, &Frame::at(FrameKind::HeliographicStonyhurst, t).unwrap())
            .unwrap();
        let s = hgs.spherical()[0];
        assert!(s.lon_deg.abs() < EPS, "lon = {}", s.lon_deg);
    }

    #[test]
    fn carrington_offsets_longitude_by_l0() {
        let g = graph();
        let t = Epoch::from_utc(2013, 1, 1, 0, 0, 0.0);
        let l0 = crate::sun::carrington_longitude(&g, t).unwrap();
        let hgs = Frame::at(FrameKind::HeliographicStonyhurst, t).unwrap();
        let c = Coordinate::from_spherical(hgs, 10.0, 5.0, 7.0e5).unwrap();
        let hgc = g
            .transform(&c, &Frame::at(FrameKind::HeliographicCarrington, t).unwrap())
            .unwrap();
        let s = hgc.spherical()[0];
        let expected = (10.0 + l0).rem_euclid(360.0);
        assert!((s.lon_deg - expected).abs() < 1e-8, "{} vs {expected}", s.lon_deg);
        assert!((s.lat_deg - 5.0).abs() < 1e-10);
    }

    #[test]
    fn hgs_without_obstime_cannot_reach_hcrs() {
        let g = graph();
        let c = Coordinate::from_spherical(
            Frame::new(FrameKind::HeliographicStonyhurst),
            0.0,
            0.0,
            1.0e6,
        )
        .unwrap();
        let err = g.transform(&c, &Frame::new(FrameKind::Hcrs)).unwrap_err();
        assert_eq!(
            err,
            TransformError::MissingAttribute {
                frame: FrameKind::HeliographicStonyhurst,
                attribute: "obstime"
            }
        );
    }
}
