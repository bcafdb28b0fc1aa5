//! Observer-based frames: heliocentric (HCC) and helioprojective (HPC).
//!
//! Both carry an observer, which must be a resolved HGS coordinate before
//! any geometry is done. HCC is Sun-centred with +Z toward the observer;
//! HPC is the same view with the origin moved to the observer.

use helio_frames::vector::{broadcast_get, broadcast_len, mat_mul, norm, transpose};
use helio_frames::{axis_angle_matrix, Axis, Mat3, Vec3, HCC_TO_HGS_PERMUTATION, HCC_TO_HPC};

use crate::context::TransformContext;
use crate::coordinate::Coordinate;
use crate::error::TransformError;
use crate::frame::{obstimes_match, Frame, FrameKind};
use crate::loopback::retime;
use crate::observer::{observers_equal, Observer};

/// Per-element distance of the observer from the Sun.
fn observer_distances(
    observer: &Coordinate,
    context: &'static str,
) -> Result<Vec<f64>, TransformError> {
    if !observer.data().has_distance() {
        return Err(TransformError::MissingDistance(context));
    }
    Ok(observer.cartesian().iter().map(norm).collect())
}

fn heliocentric_frame(template: &Frame, observer: Coordinate) -> Frame {
    Frame::new(FrameKind::Heliocentric)
        .replicate_obstime(template.obstime().cloned())
        .replicate_observer(Some(Observer::Resolved(Box::new(observer))))
}

pub(crate) fn hcc_to_hpc(
    ctx: &mut TransformContext<'_>,
    coord: &Coordinate,
    to: &Frame,
) -> Result<Coordinate, TransformError> {
    let observer = retime(ctx, to.require_observer()?, to.obstime())?;
    let distances = observer_distances(&observer, "helioprojective observer has no distance")?;

    let int = ctx.transform(coord, &heliocentric_frame(to, observer))?;
    let shift: Vec<Vec3> = distances.iter().map(|&r| [0.0, 0.0, -r]).collect();
    let data = int
        .data()
        .translated(&shift, "moving the origin to the observer")?
        .rotated(&[HCC_TO_HPC])?;
    Coordinate::realize(to, data)
}

pub(crate) fn hpc_to_hcc(
    ctx: &mut TransformContext<'_>,
    coord: &Coordinate,
    to: &Frame,
) -> Result<Coordinate, TransformError> {
    let observer = coord.frame().require_observer()?;
    if !coord.data().has_distance() {
        return Err(TransformError::MissingDistance(
            "helioprojective data has no distance",
        ));
    }
    let observer = retime(ctx, observer, coord.obstime())?;
    let distances = observer_distances(&observer, "helioprojective observer has no distance")?;

    let shift: Vec<Vec3> = distances.iter().map(|&r| [0.0, 0.0, r]).collect();
    let data = coord
        .data()
        .rotated(&[transpose(&HCC_TO_HPC)])?
        .translated(&shift, "moving the origin to the Sun")?;
    let int = Coordinate::new(heliocentric_frame(coord.frame(), observer), data)?;
    ctx.transform(&int, to)
}

/// HCC → HGS for each observer position: undo the axis permutation, tilt
/// by the observer latitude, then turn by the observer longitude.
fn hcc_to_hgs_matrices(observer: &Coordinate) -> Vec<Mat3> {
    observer
        .spherical()
        .iter()
        .map(|s| {
            let lon = axis_angle_matrix(-s.lon_deg.to_radians(), Axis::Z);
            let lat = axis_angle_matrix(s.lat_deg.to_radians(), Axis::Y);
            mat_mul(&mat_mul(&lon, &lat), &HCC_TO_HGS_PERMUTATION)
        })
        .collect()
}

pub(crate) fn hcc_to_hgs(
    ctx: &mut TransformContext<'_>,
    coord: &Coordinate,
    to: &Frame,
) -> Result<Coordinate, TransformError> {
    let observer = retime(ctx, coord.frame().require_observer()?, coord.obstime())?;
    let data = coord.data().rotated(&hcc_to_hgs_matrices(&observer))?;
    let hgs = Frame::new(FrameKind::HeliographicStonyhurst)
        .replicate_obstime(coord.obstime().cloned());
    let int = Coordinate::new(hgs, data)?;
    retime(ctx, &int, to.obstime())
}

pub(crate) fn hgs_to_hcc(
    ctx: &mut TransformContext<'_>,
    coord: &Coordinate,
    to: &Frame,
) -> Result<Coordinate, TransformError> {
    let observer = to.require_observer()?;
    let int = retime(ctx, coord, to.obstime())?;
    let observer = retime(ctx, observer, to.obstime())?;
    let matrices: Vec<Mat3> = hcc_to_hgs_matrices(&observer).iter().map(transpose).collect();
    Coordinate::realize(to, int.data().rotated(&matrices)?)
}

/// Same-kind HCC or HPC: identity for the same observer and obstime,
/// otherwise through HGS at the destination obstime.
fn observer_loopback(
    ctx: &mut TransformContext<'_>,
    coord: &Coordinate,
    to: &Frame,
) -> Result<Coordinate, TransformError> {
    let rtol = ctx.config().observer_rtol;
    if observers_equal(coord.observer(), to.observer(), true, rtol)?
        && obstimes_match(coord.obstime(), to.obstime())
    {
        return Coordinate::realize(to, coord.data().clone());
    }
    to.require_observer()?;
    coord.frame().require_observer()?;

    let hgs =
        Frame::new(FrameKind::HeliographicStonyhurst).replicate_obstime(to.obstime().cloned());
    let int = ctx.transform(coord, &hgs)?;
    ctx.transform(&int, to)
}

pub(crate) fn hcc_to_hcc(
    ctx: &mut TransformContext<'_>,
    coord: &Coordinate,
    to: &Frame,
) -> Result<Coordinate, TransformError> {
    observer_loopback(ctx, coord, to)
}

pub(crate) fn hpc_to_hpc(
    ctx: &mut TransformContext<'_>,
    coord: &Coordinate,
    to: &Frame,
) -> Result<Coordinate, TransformError> {
    observer_loopback(ctx, coord, to)
}

/// Distances along each helioprojective line of sight to the near side
/// of a sphere of radius `rsun_km` about the Sun. Misses give NaN.
pub(crate) fn calculate_distance(
    coord: &Coordinate,
    rsun_km: f64,
) -> Result<Coordinate, TransformError> {
    if coord.data().has_distance() {
        return Ok(coord.clone());
    }
    if coord.kind() != FrameKind::Helioprojective {
        return Err(TransformError::MissingDistance(
            "distances can only be estimated for helioprojective data",
        ));
    }
    let observer = coord.frame().require_observer()?;
    let radii = observer_distances(observer, "helioprojective observer has no distance")?;

    let directions = coord.data().to_spherical();
    let n = broadcast_len(directions.len(), radii.len()).ok_or(TransformError::ShapeMismatch {
        expected: directions.len(),
        found: radii.len(),
    })?;
    let distances: Vec<f64> = (0..n)
        .map(|i| {
            let s = broadcast_get(&directions, i);
            let r = *broadcast_get(&radii, i);
            let cos_alpha = s.lat_deg.to_radians().cos() * s.lon_deg.to_radians().cos();
            let c = r * r - rsun_km * rsun_km;
            let b = -2.0 * r * cos_alpha;
            (-b - (b * b - 4.0 * c).sqrt()) / 2.0
        })
        .collect();
    Coordinate::new(coord.frame().clone(), coord.data().with_distances(&distances)?)
}
