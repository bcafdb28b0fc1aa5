//! Cartesian ↔ spherical conversion and longitude wrapping.

use std::f64::consts::TAU;

use crate::vector::{norm, Vec3};

/// Spherical coordinates: longitude, latitude, distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalCoords {
    /// Longitude in degrees, measured in the x-y plane from +x toward +y.
    pub lon_deg: f64,
    /// Latitude in degrees, range [-90, 90].
    pub lat_deg: f64,
    /// Distance from origin in km.
    pub distance_km: f64,
}

impl SphericalCoords {
    pub fn new(lon_deg: f64, lat_deg: f64, distance_km: f64) -> Self {
        Self {
            lon_deg,
            lat_deg,
            distance_km,
        }
    }

    /// Copy with the longitude wrapped into `[wrap_at − 360, wrap_at)`.
    pub fn wrapped(self, wrap_at_deg: f64) -> Self {
        Self {
            lon_deg: wrap_longitude_deg(self.lon_deg, wrap_at_deg),
            ..self
        }
    }
}

/// Wrap a longitude into `[wrap_at − 360, wrap_at)`.
///
/// `wrap_at = 360` gives `[0, 360)`; `wrap_at = 180` gives `[-180, 180)`.
pub fn wrap_longitude_deg(lon_deg: f64, wrap_at_deg: f64) -> f64 {
    let base = wrap_at_deg - 360.0;
    let w = (lon_deg - base).rem_euclid(360.0) + base;
    // rem_euclid can round up to exactly 360.
    if w >= wrap_at_deg { w - 360.0 } else { w }
}

/// Convert Cartesian `[x, y, z]` (km) to spherical, longitude in `[0, 360)`.
pub fn cartesian_to_spherical(xyz: &Vec3) -> SphericalCoords {
    let r = norm(xyz);
    if r == 0.0 {
        return SphericalCoords::new(0.0, 0.0, 0.0);
    }
    let lon = xyz[1].atan2(xyz[0]).rem_euclid(TAU);
    let lat = (xyz[2] / r).clamp(-1.0, 1.0).asin();
    SphericalCoords::new(lon.to_degrees(), lat.to_degrees(), r)
}

/// Convert spherical coordinates back to Cartesian `[x, y, z]` (km).
pub fn spherical_to_cartesian(s: &SphericalCoords) -> Vec3 {
    let u = unit_vector(s.lon_deg, s.lat_deg);
    [u[0] * s.distance_km, u[1] * s.distance_km, u[2] * s.distance_km]
}

/// Unit vector pointing at (`lon_deg`, `lat_deg`).
pub fn unit_vector(lon_deg: f64, lat_deg: f64) -> Vec3 {
    let (sin_lon, cos_lon) = lon_deg.to_radians().sin_cos();
    let (sin_lat, cos_lat) = lat_deg.to_radians().sin_cos();
    [cos_lat * cos_lon, cos_lat * sin_lon, sin_lat]
}

/// Spherical state: position (lon, lat, distance) plus angular velocities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalState {
    /// Longitude in degrees, range [0, 360).
    pub lon_deg: f64,
    /// Latitude in degrees, range [-90, 90].
    pub lat_deg: f64,
    /// Distance from origin in km.
    pub distance_km: f64,
    /// Longitude rate of change in deg/day.
    pub lon_speed: f64,
    /// Latitude rate of change in deg/day.
    pub lat_speed: f64,
    /// Radial velocity in km/s.
    pub distance_speed: f64,
}

/// Convert a Cartesian state (km, km/s) to spherical position and rates.
///
/// On the origin or the polar axis the undefined rates are reported as zero.
pub fn cartesian_state_to_spherical_state(pos: &Vec3, vel: &Vec3) -> SphericalState {
    const TINY: f64 = 1e-30;
    let s = cartesian_to_spherical(pos);
    let r = s.distance_km;
    if r < TINY {
        return SphericalState {
            lon_deg: 0.0,
            lat_deg: 0.0,
            distance_km: 0.0,
            lon_speed: 0.0,
            lat_speed: 0.0,
            distance_speed: 0.0,
        };
    }

    let [x, y, z] = *pos;
    let [vx, vy, vz] = *vel;
    let rxy_sq = x * x + y * y;
    let (dlon, dlat) = if rxy_sq < TINY {
        (0.0, 0.0)
    } else {
        (
            (x * vy - y * vx) / rxy_sq,
            (vz * rxy_sq - z * (x * vx + y * vy)) / (r * r * rxy_sq.sqrt()),
        )
    };

    SphericalState {
        lon_deg: s.lon_deg,
        lat_deg: s.lat_deg,
        distance_km: r,
        lon_speed: dlon.to_degrees() * 86_400.0,
        lat_speed: dlat.to_degrees() * 86_400.0,
        distance_speed: (x * vx + y * vy + z * vz) / r,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-10;

    #[test]
    fn axes() {
        let s = cartesian_to_spherical(&[0.0, 1.0e8, 0.0]);
        assert!((s.lon_deg - 90.0).abs() < EPS);
        let s = cartesian_to_spherical(&[-1.0e8, 0.0, 0.0]);
        assert!((s.lon_deg - 180.0).abs() < EPS);
        let s = cartesian_to_spherical(&[0.0, 0.0, 1.0e8]);
        assert!((s.lat_deg - 90.0).abs() < EPS);
        assert!((s.distance_km - 1.0e8).abs() < EPS);
    }

    #[test]
    fn roundtrip() {
        let xyz = [1.234e8, -5.678e7, 3.456e7];
        let back = spherical_to_cartesian(&cartesian_to_spherical(&xyz));
        for i in 0..3 {
            assert!(
                (xyz[i] - back[i]).abs() < EPS * xyz[i].abs().max(1.0),
                "axis {i}: {:.10e} != {:.10e}",
                xyz[i],
                back[i]
            );
        }
    }

    #[test]
    fn zero_vector() {
        assert_eq!(cartesian_to_spherical(&[0.0; 3]).distance_km, 0.0);
    }

    #[test]
    fn wrapping() {
        assert_eq!(wrap_longitude_deg(270.0, 180.0), -90.0);
        assert_eq!(wrap_longitude_deg(-90.0, 360.0), 270.0);
        assert_eq!(wrap_longitude_deg(180.0, 180.0), -180.0);
        assert_eq!(wrap_longitude_deg(360.0, 360.0), 0.0);
        assert_eq!(wrap_longitude_deg(725.0, 360.0), 5.0);
        assert!(wrap_longitude_deg(-1e-17, 360.0) < 360.0);
        let s = SphericalCoords::new(350.0, 10.0, 1.0).wrapped(180.0);
        assert_eq!(s.lon_deg, -10.0);
    }

    #[test]
    fn unit_vector_is_unit() {
        let u = unit_vector(123.0, -45.0);
        assert!((norm(&u) - 1.0).abs() < 1e-15);
    }

    #[test]
    fn spherical_state_along_x_with_y_velocity() {
        let r = 1.0e8;
        let v = 30.0;
        let s = cartesian_state_to_spherical_state(&[r, 0.0, 0.0], &[0.0, v, 0.0]);
        let expected_deg_per_day = (v / r).to_degrees() * 86_400.0;
        assert!((s.lon_speed - expected_deg_per_day).abs() < 1e-9);
        assert!(s.lat_speed.abs() < EPS);
        assert!(s.distance_speed.abs() < EPS);
    }

    #[test]
    fn spherical_state_radial_motion() {
        let s = cartesian_state_to_spherical_state(&[3.0e7, 4.0e7, 0.0], &[3.0, 4.0, 0.0]);
        assert!((s.distance_speed - 5.0).abs() < EPS);
        assert!(s.lon_speed.abs() < EPS);
    }

    #[test]
    fn spherical_state_zero_vector() {
        let s = cartesian_state_to_spherical_state(&[0.0; 3], &[1.0, 0.0, 0.0]);
        assert_eq!(s.distance_km, 0.0);
        assert_eq!(s.lon_speed, 0.0);
    }
}
