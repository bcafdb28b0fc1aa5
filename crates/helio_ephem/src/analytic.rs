//! Analytic barycentric ephemeris from planetary mean elements.

use helio_frames::vector::{add, scale, sub};
use helio_frames::Vec3;
use helio_time::{Epoch, DAYS_PER_JULIAN_CENTURY, J2000_JD};
use tracing::warn;

use crate::kepler::{elements, PLANETS};
use crate::moon::{geocentric_position, EARTH_MOON_MASS_RATIO};
use crate::{central_difference, Body, EphemerisConfig, EphemerisError, EphemerisProvider, StateVector};

/// First valid Julian Date (1800-01-01 TDB).
pub const VALID_FROM_JD: f64 = 2_378_496.5;
/// Last valid Julian Date (2050-12-31 TDB).
pub const VALID_TO_JD: f64 = 2_469_807.5;

/// Planetary mean-element ephemeris, 1800–2050.
///
/// The Sun's barycentric offset is the mass-weighted reflex of the eight
/// planetary orbits; Earth and Moon are split from the Earth-Moon
/// barycentre with the low-precision lunar theory. Positions are good to
/// roughly 10⁻⁴ au for the Earth and a few thousand km for the Sun.
#[derive(Debug, Clone, Default)]
pub struct KeplerianEphemeris {
    config: EphemerisConfig,
}

impl KeplerianEphemeris {
    pub fn new(config: EphemerisConfig) -> Result<Self, EphemerisError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EphemerisConfig {
        &self.config
    }

    fn check_epoch(&self, body: Body, epoch: Epoch) -> Result<(), EphemerisError> {
        let jd_tdb = epoch.as_jd_tdb();
        if !jd_tdb.is_finite() {
            return Err(EphemerisError::NonFiniteEpoch);
        }
        if !(VALID_FROM_JD..=VALID_TO_JD).contains(&jd_tdb) {
            if self.config.strict_validation {
                return Err(EphemerisError::EpochOutOfRange { body, jd_tdb });
            }
            warn!(%body, jd_tdb, "extrapolating mean elements outside 1800-2050");
        }
        Ok(())
    }

    /// Heliocentric ICRF position of `body` in km.
    pub fn heliocentric(&self, body: Body, epoch: Epoch) -> Result<Vec3, EphemerisError> {
        self.check_epoch(body, epoch)?;
        Ok(heliocentric_at(body, centuries(epoch)))
    }
}

fn centuries(epoch: Epoch) -> f64 {
    (epoch.as_jd_tdb() - J2000_JD) / DAYS_PER_JULIAN_CENTURY
}

/// Earth offset from the Earth-Moon barycentre, as a fraction of the geocentric Moon vector.
const EARTH_FROM_EMB: f64 = 1.0 / (1.0 + EARTH_MOON_MASS_RATIO);

fn heliocentric_at(body: Body, t: f64) -> Vec3 {
    let emb = || {
        elements(Body::EarthMoonBarycenter)
            .map_or([0.0; 3], |el| el.heliocentric_position(t))
    };
    match body {
        Body::Sun => [0.0; 3],
        Body::Earth => sub(&emb(), &scale(&geocentric_position(t), EARTH_FROM_EMB)),
        Body::Moon => {
            let moon = geocentric_position(t);
            add(&sub(&emb(), &scale(&moon, EARTH_FROM_EMB)), &moon)
        }
        planet => elements(planet).map_or([0.0; 3], |el| el.heliocentric_position(t)),
    }
}

/// Barycentric Sun: `−Σ μᵢ rᵢ / (1 + Σ μᵢ)` with μ the planet/Sun mass ratio.
fn sun_barycentric(t: f64) -> Vec3 {
    let mut weighted = [0.0; 3];
    let mut total = 1.0;
    for (_, el) in &PLANETS {
        let mu = 1.0 / el.sun_mass_ratio;
        weighted = add(&weighted, &scale(&el.heliocentric_position(t), mu));
        total += mu;
    }
    scale(&weighted, -1.0 / total)
}

impl EphemerisProvider for KeplerianEphemeris {
    fn name(&self) -> &'static str {
        "keplerian-mean-elements"
    }

    fn position(&self, body: Body, epoch: Epoch) -> Result<Vec3, EphemerisError> {
        self.check_epoch(body, epoch)?;
        let t = centuries(epoch);
        Ok(add(&sun_barycentric(t), &heliocentric_at(body, t)))
    }

    fn state(&self, body: Body, epoch: Epoch) -> Result<StateVector, EphemerisError> {
        central_difference(self, body, epoch, self.config.velocity_step_s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AU_KM;
    use helio_frames::vector::norm;

    const EPS: f64 = 1e-6;

    fn epoch(y: i32, m: u32, d: u32) -> Epoch {
        Epoch::from_utc(y, m, d, 0, 0, 0.0)
    }

    #[test]
    fn sun_is_within_solar_system_barycentre_envelope() {
        let eph = KeplerianEphemeris::default();
        let sun = eph.position(Body::Sun, epoch(2013, 4, 1)).unwrap();
        // The barycentre stays within ~2.2 solar radii of the Sun's centre.
        assert!(norm(&sun) < 1.6e6, "|sun| = {}", norm(&sun));
    }

    #[test]
    fn earth_sun_distance_perihelion_2013() {
        let eph = KeplerianEphemeris::default();
        let t = epoch(2013, 1, 1);
        let d = norm(&sub(
            &eph.position(Body::Earth, t).unwrap(),
            &eph.position(Body::Sun, t).unwrap(),
        )) / AU_KM;
        // Astronomical Almanac: 0.98329 au.
        assert!((d - 0.983_295).abs() < 5e-5, "d = {d}");
    }

    #[test]
    fn earth_moon_split_is_consistent() {
        let eph = KeplerianEphemeris::default();
        let t = epoch(2013, 9, 1);
        let earth = eph.position(Body::Earth, t).unwrap();
        let moon = eph.position(Body::Moon, t).unwrap();
        let emb = eph.position(Body::EarthMoonBarycenter, t).unwrap();
        let recombined: Vec3 = std::array::from_fn(|i| {
            (earth[i] * EARTH_MOON_MASS_RATIO + moon[i]) / (EARTH_MOON_MASS_RATIO + 1.0)
        });
        for i in 0..3 {
            assert!((recombined[i] - emb[i]).abs() < EPS * AU_KM, "axis {i}");
        }
    }

    #[test]
    fn earth_orbital_speed() {
        let eph = KeplerianEphemeris::default();
        let s = eph.state(Body::Earth, epoch(2013, 4, 1)).unwrap();
        let v = norm(&s.velocity_km_s);
        assert!((29.0..=30.5).contains(&v), "v = {v} km/s");
    }

    #[test]
    fn strict_range_rejects_far_future() {
        let eph = KeplerianEphemeris::default();
        let err = eph.position(Body::Earth, epoch(2100, 1, 1)).unwrap_err();
        assert!(matches!(err, EphemerisError::EpochOutOfRange { body: Body::Earth, .. }));
    }

    #[test]
    fn lenient_range_extrapolates() {
        let eph = KeplerianEphemeris::new(EphemerisConfig {
            strict_validation: false,
            ..EphemerisConfig::default()
        })
        .unwrap();
        assert!(eph.position(Body::Earth, epoch(2100, 1, 1)).is_ok());
    }

    #[test]
    fn non_finite_epoch_rejected() {
        let eph = KeplerianEphemeris::default();
        let err = eph
            .position(Body::Sun, Epoch::from_tdb_seconds(f64::NAN))
            .unwrap_err();
        assert_eq!(err, EphemerisError::NonFiniteEpoch);
    }

    #[test]
    fn heliocentric_sun_is_origin() {
        let eph = KeplerianEphemeris::default();
        assert_eq!(eph.heliocentric(Body::Sun, epoch(2000, 1, 1)).unwrap(), [0.0; 3]);
    }

    // Compile-time assertion: the provider must be Send + Sync.
    #[allow(dead_code)]
    const _: () = {
        fn assert_send_sync<T: Send + Sync>() {}
        fn check() {
            assert_send_sync::<KeplerianEphemeris>();
        }
    };
}
