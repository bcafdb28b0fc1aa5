//! Low-precision geocentric Moon.
//!
//! Principal periodic terms of the Meeus lunar theory (_Astronomical
//! Algorithms_, ch. 47): accurate to a few hundredths of a degree and a few
//! hundred km, which places the Earth within a few km of its true offset
//! from the Earth-Moon barycentre.

use helio_frames::{ecliptic_to_icrf, general_precession_longitude_deg, Vec3};

/// Earth mass / Moon mass.
pub const EARTH_MOON_MASS_RATIO: f64 = 81.300_56;

/// Geocentric ICRF position of the Moon in km at `t` Julian centuries TDB past J2000.
pub fn geocentric_position(t: f64) -> Vec3 {
    let lp = 218.316_447_7 + 481_267.881_234_21 * t;
    let d = (297.850_192_1 + 445_267.111_403_4 * t).to_radians();
    let m = (357.529_109_2 + 35_999.050_290_9 * t).to_radians();
    let mp = (134.963_396_4 + 477_198.867_505_5 * t).to_radians();
    let f = (93.272_095_0 + 483_202.017_523_3 * t).to_radians();

    // Ecliptic and equinox of date, brought back to J2000 in longitude.
    let lon = lp + 6.288_774 * mp.sin() + 1.274_027 * (2.0 * d - mp).sin()
        + 0.658_314 * (2.0 * d).sin()
        + 0.213_618 * (2.0 * mp).sin()
        - 0.185_116 * m.sin()
        - 0.114_332 * (2.0 * f).sin()
        - general_precession_longitude_deg(t);
    let lat = 5.128_122 * f.sin()
        + 0.280_602 * (mp + f).sin()
        + 0.277_693 * (mp - f).sin()
        + 0.173_237 * (2.0 * d - f).sin();
    let dist = 385_000.56
        - 20_905.355 * mp.cos()
        - 3_699.111 * (2.0 * d - mp).cos()
        - 2_955.968 * (2.0 * d).cos()
        - 569.925 * (2.0 * mp).cos();

    let (sl, cl) = lon.to_radians().sin_cos();
    let (sb, cb) = lat.to_radians().sin_cos();
    ecliptic_to_icrf(&[dist * cb * cl, dist * cb * sl, dist * sb])
}
