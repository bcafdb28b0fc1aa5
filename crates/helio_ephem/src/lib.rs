//! Barycentric body ephemerides.
//!
//! The [`EphemerisProvider`] trait is the seam through which coordinate
//! transforms obtain Sun and Earth positions. [`KeplerianEphemeris`] is the
//! built-in analytic provider: planetary mean elements for the Sun's
//! barycentric reflex, plus a low-precision lunar term to split the Earth
//! from the Earth-Moon barycentre.
//!
//! All vectors are ICRF-aligned, barycentric, in km and km/s; epochs are TDB.

pub mod analytic;
pub mod body;
pub mod error;
pub mod kepler;
pub mod moon;

use helio_frames::Vec3;
use helio_time::Epoch;

pub use analytic::KeplerianEphemeris;
pub use body::Body;
pub use error::EphemerisError;
pub use kepler::AU_KM;

/// Default half-width of the central difference used for velocities.
pub const DEFAULT_VELOCITY_STEP_S: f64 = 60.0;

/// Ephemeris configuration used at startup time.
#[derive(Debug, Clone, PartialEq)]
pub struct EphemerisConfig {
    /// Reject epochs outside the provider's validity window instead of
    /// extrapolating with a warning.
    pub strict_validation: bool,
    /// Step (seconds) for finite-difference velocities.
    pub velocity_step_s: f64,
}

impl Default for EphemerisConfig {
    fn default() -> Self {
        Self {
            strict_validation: true,
            velocity_step_s: DEFAULT_VELOCITY_STEP_S,
        }
    }
}

impl EphemerisConfig {
    pub fn validate(&self) -> Result<(), EphemerisError> {
        if !(self.velocity_step_s.is_finite() && self.velocity_step_s > 0.0) {
            return Err(EphemerisError::InvalidConfig(
                "velocity_step_s must be positive and finite",
            ));
        }
        Ok(())
    }
}

/// Cartesian state vector output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateVector {
    pub position_km: Vec3,
    pub velocity_km_s: Vec3,
}

/// Source of barycentric body positions.
///
/// Implementations must be shareable across threads; transforms hold a
/// provider behind an `Arc` and query it from any thread.
pub trait EphemerisProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Barycentric ICRF position of `body` in km.
    fn position(&self, body: Body, epoch: Epoch) -> Result<Vec3, EphemerisError>;

    /// Barycentric ICRF position and velocity of `body`.
    ///
    /// The default differentiates [`position`](Self::position) over
    /// ±[`DEFAULT_VELOCITY_STEP_S`].
    fn state(&self, body: Body, epoch: Epoch) -> Result<StateVector, EphemerisError> {
        central_difference(self, body, epoch, DEFAULT_VELOCITY_STEP_S)
    }
}

/// State from a symmetric difference of positions `h` seconds either side.
pub fn central_difference<P: EphemerisProvider + ?Sized>(
    provider: &P,
    body: Body,
    epoch: Epoch,
    h: f64,
) -> Result<StateVector, EphemerisError> {
    let position_km = provider.position(body, epoch)?;
    let ahead = provider.position(body, epoch.offset_seconds(h))?;
    let behind = provider.position(body, epoch.offset_seconds(-h))?;
    let velocity_km_s = std::array::from_fn(|i| (ahead[i] - behind[i]) / (2.0 * h));
    Ok(StateVector {
        position_km,
        velocity_km_s,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Uniform;

    impl EphemerisProvider for Uniform {
        fn name(&self) -> &'static str {
            "uniform"
        }

        fn position(&self, _body: Body, epoch: Epoch) -> Result<Vec3, EphemerisError> {
            let t = epoch.as_tdb_seconds();
            Ok([3.0 * t, -2.0 * t, 1.0e6])
        }
    }

    #[test]
    fn default_state_differentiates_position() {
        let s = Uniform.state(Body::Sun, Epoch::from_tdb_seconds(1.0e8)).unwrap();
        assert!((s.velocity_km_s[0] - 3.0).abs() < 1e-6);
        assert!((s.velocity_km_s[1] + 2.0).abs() < 1e-6);
        assert!(s.velocity_km_s[2].abs() < 1e-12);
    }

    #[test]
    fn config_rejects_bad_step() {
        let config = EphemerisConfig {
            velocity_step_s: 0.0,
            ..EphemerisConfig::default()
        };
        assert!(matches!(config.validate(), Err(EphemerisError::InvalidConfig(_))));
        let config = EphemerisConfig {
            velocity_step_s: f64::NAN,
            ..EphemerisConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(EphemerisConfig::default().validate().is_ok());
    }
}
