//! Coordinates: data realized in a frame.

use helio_frames::vector::broadcast_len;
use helio_frames::{cartesian_state_to_spherical_state, SphericalCoords, SphericalState, Vec3};

use crate::data::CoordData;
use crate::error::TransformError;
use crate::frame::{Frame, FrameKind, ObsTime};
use crate::graph::TransformGraph;
use crate::observer::Observer;
use crate::transforms::heliocentric;

/// Coordinate data in a specific frame.
///
/// A batch obstime and the data must have broadcast-compatible lengths;
/// a single point paired with N obstimes is repeated N times.
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinate {
    frame: Frame,
    data: CoordData,
}

impl Coordinate {
    pub fn new(frame: Frame, data: CoordData) -> Result<Self, TransformError> {
        let data = match frame.obstime() {
            Some(t) if t.len() != data.len() => {
                let n = broadcast_len(t.len(), data.len()).ok_or(TransformError::ShapeMismatch {
                    expected: data.len(),
                    found: t.len(),
                })?;
                data.broadcast_to(n)?
            }
            _ => data,
        };
        Ok(Self { frame, data })
    }

    pub fn from_spherical(
        frame: Frame,
        lon_deg: f64,
        lat_deg: f64,
        distance_km: f64,
    ) -> Result<Self, TransformError> {
        let point = SphericalCoords::new(lon_deg, lat_deg, distance_km);
        Self::new(frame, CoordData::from_spherical(&[point])?)
    }

    /// Direction-only coordinate.
    pub fn from_lon_lat(frame: Frame, lon_deg: f64, lat_deg: f64) -> Result<Self, TransformError> {
        Self::new(frame, CoordData::from_lon_lat(&[(lon_deg, lat_deg)])?)
    }

    pub fn from_cartesian(frame: Frame, xyz: Vec3) -> Result<Self, TransformError> {
        Self::new(frame, CoordData::cartesian(vec![xyz])?)
    }

    /// Point on a sphere of radius `rsun_km` about the frame origin.
    pub fn on_surface(
        frame: Frame,
        lon_deg: f64,
        lat_deg: f64,
        rsun_km: f64,
    ) -> Result<Self, TransformError> {
        Self::from_spherical(frame, lon_deg, lat_deg, rsun_km)
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn data(&self) -> &CoordData {
        &self.data
    }

    pub fn kind(&self) -> FrameKind {
        self.frame.kind()
    }

    pub fn obstime(&self) -> Option<&ObsTime> {
        self.frame.obstime()
    }

    pub fn observer(&self) -> Option<&Observer> {
        self.frame.observer()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn cartesian(&self) -> &[Vec3] {
        self.data.positions()
    }

    pub fn velocities(&self) -> Option<&[Vec3]> {
        self.data.velocities()
    }

    /// Spherical view with longitudes wrapped for this frame kind.
    pub fn spherical(&self) -> Vec<SphericalCoords> {
        let wrap = self.kind().longitude_wrap_deg();
        self.data
            .to_spherical()
            .into_iter()
            .map(|s| s.wrapped(wrap))
            .collect()
    }

    /// Spherical positions with angular rates, when velocities are present.
    pub fn spherical_states(&self) -> Option<Vec<SphericalState>> {
        let wrap = self.kind().longitude_wrap_deg();
        let vel = self.data.velocities()?;
        Some(
            self.data
                .positions()
                .iter()
                .zip(vel)
                .map(|(p, v)| {
                    let mut s = cartesian_state_to_spherical_state(p, v);
                    s.lon_deg = helio_frames::wrap_longitude_deg(s.lon_deg, wrap);
                    s
                })
                .collect(),
        )
    }

    /// Re-express this coordinate in `frame`.
    pub fn transform_to(
        &self,
        graph: &TransformGraph,
        frame: &Frame,
    ) -> Result<Self, TransformError> {
        graph.transform(self, frame)
    }

    /// Fill in distances for direction-only helioprojective data by
    /// intersecting each line of sight with a sphere of radius `rsun_km`
    /// centred on the Sun. Lines of sight that miss get NaN.
    ///
    /// Data that already has distances is returned unchanged.
    pub fn calculate_distance(&self, rsun_km: f64) -> Result<Self, TransformError> {
        heliocentric::calculate_distance(self, rsun_km)
    }

    /// Same data, different frame, no geometry.
    pub(crate) fn realize(frame: &Frame, data: CoordData) -> Result<Self, TransformError> {
        Self::new(frame.clone(), data)
    }

    pub(crate) fn without_velocities(&self) -> Self {
        Self {
            frame: self.frame.clone(),
            data: self.data.without_velocities(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helio_time::Epoch;

    const EPS: f64 = 1e-9;

    #[test]
    fn scalar_data_broadcasts_over_batch_obstime() {
        let times = ObsTime::new(vec![Epoch::J2000, Epoch::from_tdb_seconds(60.0)]).unwrap();
        let frame = Frame::at(FrameKind::HeliographicStonyhurst, times).unwrap();
        let c = Coordinate::from_spherical(frame, 10.0, 5.0, 7.0e5).unwrap();
        assert_eq!(c.len(), 2);
        assert_eq!(c.cartesian()[0], c.cartesian()[1]);
    }

    #[test]
    fn mismatched_batch_rejected() {
        let times = ObsTime::new(vec![Epoch::J2000; 2]).unwrap();
        let frame = Frame::at(FrameKind::HeliographicStonyhurst, times).unwrap();
        let data = CoordData::cartesian(vec![[1.0, 0.0, 0.0]; 3]).unwrap();
        assert_eq!(
            Coordinate::new(frame, data).unwrap_err(),
            TransformError::ShapeMismatch {
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn spherical_wraps_per_kind() {
        let hgs = Coordinate::from_spherical(
            Frame::new(FrameKind::HeliographicStonyhurst),
            270.0,
            0.0,
            1.0,
        )
        .unwrap();
        assert!((hgs.spherical()[0].lon_deg + 90.0).abs() < EPS);

        let hgc = Coordinate::from_spherical(
            Frame::new(FrameKind::HeliographicCarrington),
            -90.0,
            0.0,
            1.0,
        )
        .unwrap();
        assert!((hgc.spherical()[0].lon_deg - 270.0).abs() < EPS);
    }

    #[test]
    fn lon_lat_is_direction_only() {
        let c = Coordinate::from_lon_lat(Frame::new(FrameKind::Icrs), 30.0, 40.0).unwrap();
        assert!(!c.data().has_distance());
        let s = c.spherical()[0];
        assert!((s.lon_deg - 30.0).abs() < EPS);
        assert!((s.lat_deg - 40.0).abs() < EPS);
    }
}
