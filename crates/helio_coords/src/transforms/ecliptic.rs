//! Ecliptic and inertial frames hung off heliocentric mean ecliptic:
//! heliocentric Earth ecliptic (HEE), geocentric solar ecliptic (GSE),
//! heliocentric inertial (HCI) and geocentric Earth equatorial (GEI).
//!
//! Every kind here is reached from HCRS at its own obstime with a rotation
//! (and, for the geocentric kinds, a shift to the Earth's centre). The
//! HME edges go through HCRS at the destination obstime.

use std::sync::LazyLock;

use helio_frames::vector::{mat_mul, mat_vec, neg, transpose};
use helio_frames::{
    axis_angle_matrix, mean_ecliptic_matrix, vector_to_vector_matrix, xz_plane_matrix, Axis,
    Mat3, Vec3, OBLIQUITY_J2000_RAD, X_AXIS, Y_AXIS, Z_AXIS,
};

use crate::context::TransformContext;
use crate::coordinate::Coordinate;
use crate::data::CoordData;
use crate::error::TransformError;
use crate::frame::{obstimes_match, Frame, FrameKind, ObsTime};
use crate::sun::solar_pole;

/// HCRS → HCI. The solar pole goes to +Z and the ascending node of the
/// solar equator on the J2000 mean ecliptic to +X.
static HCRS_TO_HCI: LazyLock<Mat3> = LazyLock::new(|| {
    let ecliptic = mean_ecliptic_matrix(0.0);
    let detilt = vector_to_vector_matrix(&mat_vec(&ecliptic, &solar_pole()), &Z_AXIS);
    let ecliptic_pole = mat_vec(&detilt, &Z_AXIS);
    let node = mat_mul(
        &vector_to_vector_matrix(&X_AXIS, &Y_AXIS),
        &xz_plane_matrix(&ecliptic_pole),
    );
    mat_mul(&mat_mul(&node, &detilt), &ecliptic)
});

/// HCRS axes → GEI axes: J2000 mean ecliptic, then back up by the J2000
/// obliquity onto the mean equator.
static HCRS_TO_GEI: LazyLock<Mat3> = LazyLock::new(|| {
    mat_mul(
        &axis_angle_matrix(-OBLIQUITY_J2000_RAD, Axis::X),
        &mean_ecliptic_matrix(0.0),
    )
});

pub(crate) fn hcrs_to_hci_matrix() -> &'static Mat3 {
    &HCRS_TO_HCI
}

pub(crate) fn hcrs_to_gei_matrix() -> &'static Mat3 {
    &HCRS_TO_GEI
}

/// HCRS → HEE at each epoch, with the Sun–Earth vector in HEE.
///
/// The Sun–Earth vector is taken into the mean ecliptic of date, turned
/// about Z into the XZ plane, then tilted onto +X.
fn hee_geometry(
    ctx: &mut TransformContext<'_>,
    obstime: &ObsTime,
) -> Result<(Vec<Mat3>, Vec<Vec3>), TransformError> {
    let sun_earth = ctx.sun_earth(obstime)?;
    let mut matrices = Vec::with_capacity(sun_earth.len());
    let mut earth = Vec::with_capacity(sun_earth.len());
    for (epoch, se) in obstime.epochs().iter().zip(&sun_earth) {
        let ecliptic = mean_ecliptic_matrix(epoch.julian_centuries());
        let v = mat_vec(&ecliptic, se);
        let about_z = xz_plane_matrix(&v);
        let tilt = vector_to_vector_matrix(&mat_vec(&about_z, &v), &X_AXIS);
        let m = mat_mul(&mat_mul(&tilt, &about_z), &ecliptic);
        earth.push(mat_vec(&m, se));
        matrices.push(m);
    }
    Ok((matrices, earth))
}

/// Data in HCRS at `obstime` re-expressed in `kind` at the same obstime.
fn from_hcrs(
    ctx: &mut TransformContext<'_>,
    kind: FrameKind,
    data: &CoordData,
    obstime: &ObsTime,
) -> Result<CoordData, TransformError> {
    match kind {
        FrameKind::HeliocentricEarthEcliptic => {
            let (matrices, _) = hee_geometry(ctx, obstime)?;
            data.rotated(&matrices)
        }
        FrameKind::GeocentricSolarEcliptic => {
            let (matrices, earth) = hee_geometry(ctx, obstime)?;
            let to_earth: Vec<Vec3> = earth.iter().map(neg).collect();
            Ok(data
                .rotated(&matrices)?
                .translated(&to_earth, "moving the origin to the Earth")?
                .flipped_xy())
        }
        FrameKind::HeliocentricInertial => data.rotated(&[*hcrs_to_hci_matrix()]),
        FrameKind::GeocentricEarthEquatorial => {
            let to_earth: Vec<Vec3> = ctx.sun_earth(obstime)?.iter().map(neg).collect();
            data.translated(&to_earth, "moving the origin to the Earth")?
                .rotated(&[*hcrs_to_gei_matrix()])
        }
        other => Err(TransformError::NoPath {
            from: FrameKind::Hcrs,
            to: other,
        }),
    }
}

/// `coord` re-expressed in HCRS at its own obstime.
fn to_hcrs(
    ctx: &mut TransformContext<'_>,
    coord: &Coordinate,
) -> Result<Coordinate, TransformError> {
    let obstime = coord.frame().require_obstime()?;
    let data = match coord.kind() {
        FrameKind::HeliocentricEarthEcliptic => {
            let (matrices, _) = hee_geometry(ctx, obstime)?;
            coord.data().rotated(&transposed(&matrices))?
        }
        FrameKind::GeocentricSolarEcliptic => {
            let (matrices, earth) = hee_geometry(ctx, obstime)?;
            coord
                .data()
                .flipped_xy()
                .translated(&earth, "moving the origin to the Sun")?
                .rotated(&transposed(&matrices))?
        }
        FrameKind::HeliocentricInertial => {
            coord.data().rotated(&[transpose(hcrs_to_hci_matrix())])?
        }
        FrameKind::GeocentricEarthEquatorial => {
            let sun_earth = ctx.sun_earth(obstime)?;
            coord
                .data()
                .rotated(&[transpose(hcrs_to_gei_matrix())])?
                .translated(&sun_earth, "moving the origin to the Sun")?
        }
        other => {
            return Err(TransformError::NoPath {
                from: other,
                to: FrameKind::Hcrs,
            });
        }
    };
    Coordinate::new(Frame::at(FrameKind::Hcrs, obstime.clone())?, data)
}

fn transposed(matrices: &[Mat3]) -> Vec<Mat3> {
    matrices.iter().map(transpose).collect()
}

/// HME (any obstime and equinox) into `to` at its obstime.
fn from_mean_ecliptic(
    ctx: &mut TransformContext<'_>,
    coord: &Coordinate,
    to: &Frame,
) -> Result<Coordinate, TransformError> {
    let obstime = to.require_obstime()?;
    let hcrs = ctx.transform(coord, &Frame::at(FrameKind::Hcrs, obstime.clone())?)?;
    let data = from_hcrs(ctx, to.kind(), hcrs.data(), obstime)?;
    Coordinate::realize(to, data)
}

/// Into HME (any obstime and equinox) by way of HCRS.
fn to_mean_ecliptic(
    ctx: &mut TransformContext<'_>,
    coord: &Coordinate,
    to: &Frame,
) -> Result<Coordinate, TransformError> {
    let hcrs = to_hcrs(ctx, coord)?;
    ctx.transform(&hcrs, to)
}

/// Same kind, other obstime: identity when the obstimes match, otherwise
/// through HCRS at the source obstime.
fn loopback(
    ctx: &mut TransformContext<'_>,
    coord: &Coordinate,
    to: &Frame,
) -> Result<Coordinate, TransformError> {
    if obstimes_match(coord.obstime(), to.obstime()) {
        return Coordinate::realize(to, coord.data().clone());
    }
    let obstime = to.require_obstime()?;
    let hcrs = to_hcrs(ctx, coord)?;
    let hcrs = ctx.transform(&hcrs, &Frame::at(FrameKind::Hcrs, obstime.clone())?)?;
    let data = from_hcrs(ctx, to.kind(), hcrs.data(), obstime)?;
    Coordinate::realize(to, data)
}

pub(crate) fn hme_to_hee(
    ctx: &mut TransformContext<'_>,
    coord: &Coordinate,
    to: &Frame,
) -> Result<Coordinate, TransformError> {
    from_mean_ecliptic(ctx, coord, to)
}

pub(crate) fn hee_to_hme(
    ctx: &mut TransformContext<'_>,
    coord: &Coordinate,
    to: &Frame,
) -> Result<Coordinate, TransformError> {
    to_mean_ecliptic(ctx, coord, to)
}

pub(crate) fn hee_to_hee(
    ctx: &mut TransformContext<'_>,
    coord: &Coordinate,
    to: &Frame,
) -> Result<Coordinate, TransformError> {
    loopback(ctx, coord, to)
}

/// HEE → GSE: move HEE to the GSE obstime, shift the origin to the Earth,
/// then negate X and Y.
pub(crate) fn hee_to_gse(
    ctx: &mut TransformContext<'_>,
    coord: &Coordinate,
    to: &Frame,
) -> Result<Coordinate, TransformError> {
    let obstime = to.require_obstime()?;
    let hee = Frame::at(FrameKind::HeliocentricEarthEcliptic, obstime.clone())?;
    let int = ctx.transform(coord, &hee)?;
    let (_, earth) = hee_geometry(ctx, obstime)?;
    let to_earth: Vec<Vec3> = earth.iter().map(neg).collect();
    let data = int
        .data()
        .translated(&to_earth, "moving the origin to the Earth")?
        .flipped_xy();
    Coordinate::realize(to, data)
}

pub(crate) fn gse_to_hee(
    ctx: &mut TransformContext<'_>,
    coord: &Coordinate,
    to: &Frame,
) -> Result<Coordinate, TransformError> {
    let obstime = coord.frame().require_obstime()?;
    let (_, earth) = hee_geometry(ctx, obstime)?;
    let data = coord
        .data()
        .flipped_xy()
        .translated(&earth, "moving the origin to the Sun")?;
    let hee = Frame::at(FrameKind::HeliocentricEarthEcliptic, obstime.clone())?;
    let int = Coordinate::new(hee, data)?;
    ctx.transform(&int, to)
}

pub(crate) fn gse_to_gse(
    ctx: &mut TransformContext<'_>,
    coord: &Coordinate,
    to: &Frame,
) -> Result<Coordinate, TransformError> {
    loopback(ctx, coord, to)
}

pub(crate) fn hme_to_hci(
    ctx: &mut TransformContext<'_>,
    coord: &Coordinate,
    to: &Frame,
) -> Result<Coordinate, TransformError> {
    from_mean_ecliptic(ctx, coord, to)
}

pub(crate) fn hci_to_hme(
    ctx: &mut TransformContext<'_>,
    coord: &Coordinate,
    to: &Frame,
) -> Result<Coordinate, TransformError> {
    to_mean_ecliptic(ctx, coord, to)
}

pub(crate) fn hci_to_hci(
    ctx: &mut TransformContext<'_>,
    coord: &Coordinate,
    to: &Frame,
) -> Result<Coordinate, TransformError> {
    loopback(ctx, coord, to)
}

pub(crate) fn hme_to_gei(
    ctx: &mut TransformContext<'_>,
    coord: &Coordinate,
    to: &Frame,
) -> Result<Coordinate, TransformError> {
    from_mean_ecliptic(ctx, coord, to)
}

pub(crate) fn gei_to_hme(
    ctx: &mut TransformContext<'_>,
    coord: &Coordinate,
    to: &Frame,
) -> Result<Coordinate, TransformError> {
    to_mean_ecliptic(ctx, coord, to)
}

pub(crate) fn gei_to_gei(
    ctx: &mut TransformContext<'_>,
    coord: &Coordinate,
    to: &Frame,
) -> Result<Coordinate, TransformError> {
    loopback(ctx, coord, to)
}
