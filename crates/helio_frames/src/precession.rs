//! IAU 2006 precession in the Fukushima-Williams parameterization, and the
//! rotation from the ICRS to the mean ecliptic and equinox of a date.
//!
//! Source: Capitaine, Wallace & Chapront 2003, _A&A_ 412, 567-586;
//! Hilton et al. 2006; IERS Conventions 2010, Ch. 5 (eq. 5.39-5.40).

use crate::obliquity::{mean_obliquity_rad, ARCSEC_TO_RAD};
use crate::rotation::{axis_angle_matrix, Axis};
use crate::vector::{mat_mul, Mat3};

/// Fukushima-Williams precession angles (radians), bias included.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FukushimaWilliams {
    /// γ̄: GCRS right ascension of the intersection of the ecliptic of date and the GCRS equator.
    pub gamma_bar: f64,
    /// φ̄: obliquity of the ecliptic of date on the GCRS equator.
    pub phi_bar: f64,
    /// ψ̄: precession angle plus bias in longitude along the ecliptic of date.
    pub psi_bar: f64,
    /// ε_A: mean obliquity of date.
    pub eps_a: f64,
}

fn poly5(c: [f64; 6], t: f64) -> f64 {
    c[0] + (c[1] + (c[2] + (c[3] + (c[4] + c[5] * t) * t) * t) * t) * t
}

/// Precession angles at `t` Julian centuries of TT since J2000.0.
pub fn fukushima_williams_angles(t: f64) -> FukushimaWilliams {
    let gamma_bar = poly5(
        [-0.052928, 10.556378, 0.4932044, -0.00031238, -0.000002788, 0.0000000260],
        t,
    );
    let phi_bar = poly5(
        [84381.412819, -46.811016, 0.0511268, 0.00053289, -0.000000440, -0.0000000176],
        t,
    );
    let psi_bar = poly5(
        [-0.041775, 5038.481484, 1.5584175, -0.00018522, -0.000026452, -0.0000000148],
        t,
    );
    FukushimaWilliams {
        gamma_bar: gamma_bar * ARCSEC_TO_RAD,
        phi_bar: phi_bar * ARCSEC_TO_RAD,
        psi_bar: psi_bar * ARCSEC_TO_RAD,
        eps_a: mean_obliquity_rad(t),
    }
}

/// Bias-precession matrix GCRS → mean equator and equinox of date:
/// `Rx(−ε_A) · Rz(−ψ̄) · Rx(φ̄) · Rz(γ̄)`.
pub fn bias_precession_matrix(t: f64) -> Mat3 {
    let fw = fukushima_williams_angles(t);
    let r = axis_angle_matrix(fw.gamma_bar, Axis::Z);
    let r = mat_mul(&axis_angle_matrix(fw.phi_bar, Axis::X), &r);
    let r = mat_mul(&axis_angle_matrix(-fw.psi_bar, Axis::Z), &r);
    mat_mul(&axis_angle_matrix(-fw.eps_a, Axis::X), &r)
}

/// IAU 2006 general precession in ecliptic longitude, in degrees.
///
/// Accumulated westward motion of the equinox along the ecliptic since
/// J2000.0; about 5028.8″ per century.
pub fn general_precession_longitude_deg(t: f64) -> f64 {
    let arcsec = (5028.796195 + (1.1054348 + (0.00007964 + (-0.000023857 - 0.0000000383 * t) * t) * t) * t) * t;
    arcsec / 3600.0
}

/// ICRS → mean ecliptic and equinox of date, IAU 2006.
///
/// `t` is Julian centuries of TT since J2000.0 of the equinox.
pub fn mean_ecliptic_matrix(t: f64) -> Mat3 {
    mat_mul(
        &axis_angle_matrix(mean_obliquity_rad(t), Axis::X),
        &bias_precession_matrix(t),
    )
}
