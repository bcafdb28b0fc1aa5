//! IAU 2006 mean obliquity of the ecliptic.
//!
//! Source: Hilton et al. 2006, _Celestial Mechanics and Dynamical Astronomy_
//! 94, 351-367; IERS Conventions 2010, eq. 5.40.

/// Mean obliquity at J2000.0 in arcseconds.
pub const OBLIQUITY_J2000_ARCSEC: f64 = 84_381.406;

/// Mean obliquity at J2000.0 in degrees (≈ 23.4392794°).
pub const OBLIQUITY_J2000_DEG: f64 = OBLIQUITY_J2000_ARCSEC / 3600.0;

/// Mean obliquity at J2000.0 in radians.
pub const OBLIQUITY_J2000_RAD: f64 = OBLIQUITY_J2000_DEG * std::f64::consts::PI / 180.0;

/// cos(ε₀), precomputed.
pub const COS_OBL: f64 = 0.917_482_143_065_241_9;

/// sin(ε₀), precomputed.
pub const SIN_OBL: f64 = 0.397_776_969_112_605_96;

/// Arcseconds to radians.
pub const ARCSEC_TO_RAD: f64 = std::f64::consts::PI / (180.0 * 3600.0);

/// Mean obliquity of date in arcseconds.
///
/// `t` is Julian centuries of TT since J2000.0.
pub fn mean_obliquity_arcsec(t: f64) -> f64 {
    OBLIQUITY_J2000_ARCSEC
        + (-46.836769 + (-0.0001831 + (0.00200340 + (-0.000000576 - 0.0000000434 * t) * t) * t) * t) * t
}

/// Mean obliquity of date in radians.
pub fn mean_obliquity_rad(t: f64) -> f64 {
    mean_obliquity_arcsec(t) * ARCSEC_TO_RAD
}
