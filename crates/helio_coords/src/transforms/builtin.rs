//! Edges among ICRS, HCRS and heliocentric mean ecliptic (HME).
//!
//! HCRS is ICRS with the origin moved to the Sun's centre at the frame
//! obstime. HME additionally rotates onto the mean ecliptic and equinox
//! of the frame's `equinox`.

use helio_ephem::Body;
use helio_frames::vector::{mat_vec, neg};
use helio_frames::{mean_ecliptic_matrix, Vec3, IDENTITY};

use crate::context::TransformContext;
use crate::coordinate::Coordinate;
use crate::error::TransformError;
use crate::frame::{obstimes_match, Frame, FrameKind, ObsTime};
use crate::graph::AffineParts;

/// Barycentric Sun positions, plus velocities when asked for.
pub(crate) fn sun_barycentric(
    ctx: &mut TransformContext<'_>,
    obstime: &ObsTime,
    with_velocities: bool,
) -> Result<(Vec<Vec3>, Option<Vec<Vec3>>), TransformError> {
    if !with_velocities {
        return Ok((ctx.body_positions(Body::Sun, obstime)?, None));
    }
    let states = obstime
        .epochs()
        .iter()
        .map(|&e| ctx.body_state(Body::Sun, e))
        .collect::<Result<Vec<_>, _>>()?;
    Ok((
        states.iter().map(|s| s.position_km).collect(),
        Some(states.iter().map(|s| s.velocity_km_s).collect()),
    ))
}

pub(crate) fn icrs_to_hcrs(
    ctx: &mut TransformContext<'_>,
    _from: &Frame,
    to: &Frame,
    with_velocities: bool,
) -> Result<AffineParts, TransformError> {
    let (sun, sun_vel) = sun_barycentric(ctx, to.require_obstime()?, with_velocities)?;
    Ok(AffineParts {
        matrices: vec![IDENTITY],
        offsets: Some(sun.iter().map(neg).collect()),
        offset_velocities: sun_vel.map(|v| v.iter().map(neg).collect()),
    })
}

pub(crate) fn hcrs_to_icrs(
    ctx: &mut TransformContext<'_>,
    from: &Frame,
    to: &Frame,
    with_velocities: bool,
) -> Result<AffineParts, TransformError> {
    Ok(icrs_to_hcrs(ctx, to, from, with_velocities)?.inverse())
}

/// HCRS at one obstime to HCRS at another, through ICRS.
pub(crate) fn hcrs_to_hcrs(
    ctx: &mut TransformContext<'_>,
    coord: &Coordinate,
    to: &Frame,
) -> Result<Coordinate, TransformError> {
    if obstimes_match(coord.obstime(), to.obstime()) {
        return Coordinate::realize(to, coord.data().clone());
    }
    let icrs = ctx.transform(coord, &Frame::new(FrameKind::Icrs))?;
    ctx.transform(&icrs, to)
}

pub(crate) fn icrs_to_hme(
    ctx: &mut TransformContext<'_>,
    _from: &Frame,
    to: &Frame,
    with_velocities: bool,
) -> Result<AffineParts, TransformError> {
    let equinox = to.require_equinox()?;
    let obstime = to.require_obstime()?;
    let m = mean_ecliptic_matrix(equinox.julian_centuries());

    let (sun, sun_vel) = sun_barycentric(ctx, obstime, with_velocities)?;
    let shift = |v: &Vec3| neg(&mat_vec(&m, v));
    Ok(AffineParts {
        matrices: vec![m],
        offsets: Some(sun.iter().map(shift).collect()),
        offset_velocities: sun_vel.map(|v| v.iter().map(shift).collect()),
    })
}

pub(crate) fn hme_to_icrs(
    ctx: &mut TransformContext<'_>,
    from: &Frame,
    to: &Frame,
    with_velocities: bool,
) -> Result<AffineParts, TransformError> {
    Ok(icrs_to_hme(ctx, to, from, with_velocities)?.inverse())
}

/// HME with one (obstime, equinox) to another, through ICRS.
pub(crate) fn hme_to_hme(
    ctx: &mut TransformContext<'_>,
    coord: &Coordinate,
    to: &Frame,
) -> Result<Coordinate, TransformError> {
    if obstimes_match(coord.obstime(), to.obstime()) && coord.frame().equinox() == to.equinox() {
        return Coordinate::realize(to, coord.data().clone());
    }
    let icrs = ctx.transform(coord, &Frame::new(FrameKind::Icrs))?;
    ctx.transform(&icrs, to)
}
