//! Moving a coordinate to a different obstime within its own frame kind.

use crate::context::TransformContext;
use crate::coordinate::Coordinate;
use crate::error::TransformError;
use crate::frame::ObsTime;

/// Re-express `coord` at obstime `target`.
///
/// - `target` unset, or equal to the coordinate's own obstime: unchanged.
/// - coordinate obstime unset: the target obstime is attached with no
///   geometric change.
/// - otherwise: a same-kind transform from the old obstime to the new.
pub fn retime(
    ctx: &mut TransformContext<'_>,
    coord: &Coordinate,
    target: Option<&ObsTime>,
) -> Result<Coordinate, TransformError> {
    let Some(target) = target else {
        return Ok(coord.clone());
    };
    if !coord.kind().has_obstime() {
        return Ok(coord.clone());
    }
    match coord.obstime() {
        Some(own) if own.matches(target) => Ok(coord.clone()),
        Some(_) => {
            let frame = coord.frame().replicate_obstime(Some(target.clone()));
            ctx.transform(coord, &frame)
        }
        None => {
            let frame = coord.frame().replicate_obstime(Some(target.clone()));
            Coordinate::new(frame, coord.data().clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{Frame, FrameKind};
    use crate::graph::{TransformConfig, TransformGraph};
    use helio_ephem::EphemerisConfig;
    use helio_time::Epoch;

    fn graph() -> TransformGraph {
        TransformGraph::analytic(EphemerisConfig::default(), TransformConfig::default()).unwrap()
    }

    fn hgs(t: Option<Epoch>) -> Coordinate {
        let mut frame = Frame::new(FrameKind::HeliographicStonyhurst);
        if let Some(t) = t {
            frame = frame.with_obstime(t).unwrap();
        }
        Coordinate::from_spherical(frame, 20.0, -10.0, 1.0e8).unwrap()
    }

    #[test]
    fn unset_target_is_noop() {
        let g = graph();
        let mut ctx = g.context();
        let c = hgs(Some(Epoch::J2000));
        assert_eq!(retime(&mut ctx, &c, None).unwrap(), c);
        assert_eq!(ctx.stats().edges, 0);
    }

    #[test]
    fn equal_target_is_noop() {
        let g = graph();
        let mut ctx = g.context();
        let c = hgs(Some(Epoch::J2000));
        let out = retime(&mut ctx, &c, Some(&ObsTime::from(Epoch::J2000))).unwrap();
        assert_eq!(out, c);
        assert_eq!(ctx.stats().edges, 0);
    }

    #[test]
    fn unset_source_gets_stamped() {
        let g = graph();
        let mut ctx = g.context();
        let c = hgs(None);
        let t = ObsTime::from(Epoch::from_utc(2013, 1, 1, 0, 0, 0.0));
        let out = retime(&mut ctx, &c, Some(&t)).unwrap();
        assert_eq!(out.obstime(), Some(&t));
        assert_eq!(out.cartesian(), c.cartesian());
    }

    #[test]
    fn different_target_moves_geometry() {
        let g = graph();
        let mut ctx = g.context();
        let c = hgs(Some(Epoch::from_utc(2013, 1, 1, 0, 0, 0.0)));
        let t = ObsTime::from(Epoch::from_utc(2013, 1, 2, 0, 0, 0.0));
        let out = retime(&mut ctx, &c, Some(&t)).unwrap();
        assert_eq!(out.obstime(), Some(&t));
        // One day of Earth's orbital motion drags HGS longitude by about a degree.
        let dlon = out.spherical()[0].lon_deg - c.spherical()[0].lon_deg;
        assert!(dlon.abs() > 0.5 && dlon.abs() < 1.5, "dlon = {dlon}");
    }
}
