//! Batched Cartesian coordinate data.

use helio_frames::vector::{add, broadcast_get, broadcast_len, mat_vec, normalize, scale};
use helio_frames::{cartesian_to_spherical, spherical_to_cartesian, unit_vector};
use helio_frames::{Mat3, SphericalCoords, Vec3};

use crate::error::TransformError;

/// Positions (km) with optional velocities (km/s).
///
/// Direction-only data holds unit vectors and no radial distance; it can
/// be rotated but not translated.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordData {
    positions: Vec<Vec3>,
    velocities: Option<Vec<Vec3>>,
    has_distance: bool,
}

impl CoordData {
    pub fn cartesian(positions: Vec<Vec3>) -> Result<Self, TransformError> {
        if positions.is_empty() {
            return Err(TransformError::EmptyData);
        }
        Ok(Self {
            positions,
            velocities: None,
            has_distance: true,
        })
    }

    pub fn from_spherical(points: &[SphericalCoords]) -> Result<Self, TransformError> {
        Self::cartesian(points.iter().map(spherical_to_cartesian).collect())
    }

    /// Direction-only data from `(lon_deg, lat_deg)` pairs.
    pub fn from_lon_lat(lon_lat_deg: &[(f64, f64)]) -> Result<Self, TransformError> {
        let mut data =
            Self::cartesian(lon_lat_deg.iter().map(|&(lon, lat)| unit_vector(lon, lat)).collect())?;
        data.has_distance = false;
        Ok(data)
    }

    /// Attach one velocity per position.
    pub fn with_velocities(mut self, velocities: Vec<Vec3>) -> Result<Self, TransformError> {
        if velocities.len() != self.positions.len() {
            return Err(TransformError::ShapeMismatch {
                expected: self.positions.len(),
                found: velocities.len(),
            });
        }
        self.velocities = Some(velocities);
        Ok(self)
    }

    pub fn without_velocities(&self) -> Self {
        Self {
            positions: self.positions.clone(),
            velocities: None,
            has_distance: self.has_distance,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn velocities(&self) -> Option<&[Vec3]> {
        self.velocities.as_deref()
    }

    pub fn has_distance(&self) -> bool {
        self.has_distance
    }

    /// Longitude in `[0, 360)`; direction-only points report distance 1.
    pub fn to_spherical(&self) -> Vec<SphericalCoords> {
        self.positions.iter().map(cartesian_to_spherical).collect()
    }

    pub(crate) fn broadcast_to(&self, n: usize) -> Result<Self, TransformError> {
        if self.len() == n {
            return Ok(self.clone());
        }
        if self.len() != 1 {
            return Err(TransformError::ShapeMismatch {
                expected: n,
                found: self.len(),
            });
        }
        Ok(Self {
            positions: vec![self.positions[0]; n],
            velocities: self.velocities.as_ref().map(|v| vec![v[0]; n]),
            has_distance: self.has_distance,
        })
    }

    /// Apply one matrix per point (or one matrix to all).
    pub(crate) fn rotated(&self, matrices: &[Mat3]) -> Result<Self, TransformError> {
        let n = self.batch_len(matrices.len())?;
        let apply = |vs: &[Vec3]| -> Vec<Vec3> {
            (0..n)
                .map(|i| mat_vec(broadcast_get(matrices, i), broadcast_get(vs, i)))
                .collect()
        };
        Ok(Self {
            positions: apply(self.positions.as_slice()),
            velocities: self.velocities.as_deref().map(apply),
            has_distance: self.has_distance,
        })
    }

    /// Shift the origin by `offsets`. Fails on direction-only data.
    pub(crate) fn translated(
        &self,
        offsets: &[Vec3],
        context: &'static str,
    ) -> Result<Self, TransformError> {
        if !self.has_distance {
            return Err(TransformError::MissingDistance(context));
        }
        let n = self.batch_len(offsets.len())?;
        Ok(Self {
            positions: (0..n)
                .map(|i| add(broadcast_get(&self.positions, i), broadcast_get(offsets, i)))
                .collect(),
            velocities: self
                .velocities
                .as_deref()
                .map(|v| (0..n).map(|i| *broadcast_get(v, i)).collect()),
            has_distance: true,
        })
    }

    /// Add `dv` to the velocities, if any.
    pub(crate) fn with_velocity_offset(&self, dv: &[Vec3]) -> Result<Self, TransformError> {
        let Some(v) = self.velocities.as_deref() else {
            return Ok(self.clone());
        };
        let n = self.batch_len(dv.len())?;
        Ok(Self {
            positions: (0..n).map(|i| *broadcast_get(&self.positions, i)).collect(),
            velocities: Some(
                (0..n)
                    .map(|i| add(broadcast_get(v, i), broadcast_get(dv, i)))
                    .collect(),
            ),
            has_distance: self.has_distance,
        })
    }

    /// Negate x and y, leaving z.
    pub(crate) fn flipped_xy(&self) -> Self {
        let flip = |v: &Vec3| [-v[0], -v[1], v[2]];
        Self {
            positions: self.positions.iter().map(flip).collect(),
            velocities: self
                .velocities
                .as_ref()
                .map(|vs| vs.iter().map(flip).collect()),
            has_distance: self.has_distance,
        }
    }

    /// Positions moved `dt` seconds along their velocities; velocities
    /// are dropped.
    pub(crate) fn advanced(&self, dt: f64) -> Self {
        let positions = match &self.velocities {
            Some(v) => self
                .positions
                .iter()
                .zip(v)
                .map(|(p, v)| add(p, &scale(v, dt)))
                .collect(),
            None => self.positions.clone(),
        };
        Self {
            positions,
            velocities: None,
            has_distance: self.has_distance,
        }
    }

    /// Replace each point by its direction scaled to `distances[i]`.
    pub(crate) fn with_distances(&self, distances: &[f64]) -> Result<Self, TransformError> {
        let n = self.batch_len(distances.len())?;
        Ok(Self {
            positions: (0..n)
                .map(|i| {
                    let dir = normalize(broadcast_get(&self.positions, i));
                    scale(&dir, *broadcast_get(distances, i))
                })
                .collect(),
            velocities: None,
            has_distance: true,
        })
    }

    fn batch_len(&self, other: usize) -> Result<usize, TransformError> {
        broadcast_len(self.len(), other).ok_or(TransformError::ShapeMismatch {
            expected: self.len(),
            found: other,
        })
    }
}
