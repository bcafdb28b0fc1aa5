//! Rotation-matrix kernel.
//!
//! Matrices follow the coordinate-axis ("passive") convention: the matrix
//! for a rotation of `angle` about `axis` re-expresses a fixed vector in
//! axes that have been turned by `angle`, so the vector's components turn
//! by `-angle`. About Z this is
//!
//! ```text
//! [ cos  sin  0 ]
//! [-sin  cos  0 ]
//! [  0    0   1 ]
//! ```
//!
//! Every function is pure and deterministic.

use crate::obliquity::{COS_OBL, SIN_OBL};
use crate::vector::{
    broadcast_get, broadcast_len, cross, dot, norm, normalize, Mat3, Vec3, IDENTITY, X_AXIS,
};

/// A named coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Unit vector along the axis.
    pub const fn unit(self) -> Vec3 {
        match self {
            Self::X => [1.0, 0.0, 0.0],
            Self::Y => [0.0, 1.0, 0.0],
            Self::Z => [0.0, 0.0, 1.0],
        }
    }
}

/// Rotation of `angle_rad` about a named axis (closed form).
pub fn axis_angle_matrix(angle_rad: f64, axis: Axis) -> Mat3 {
    let (s, c) = angle_rad.sin_cos();
    match axis {
        Axis::X => [[1.0, 0.0, 0.0], [0.0, c, s], [0.0, -s, c]],
        Axis::Y => [[c, 0.0, -s], [0.0, 1.0, 0.0], [s, 0.0, c]],
        Axis::Z => [[c, s, 0.0], [-s, c, 0.0], [0.0, 0.0, 1.0]],
    }
}

/// Rotation of `angle_rad` about an arbitrary axis vector (Rodrigues).
///
/// The axis is normalized first. `R = (1 − c)·a·aᵀ + c·I + s·K` with
/// `K = [[0, a₂, −a₁], [−a₂, 0, a₀], [a₁, −a₀, 0]]`.
pub fn axis_vector_angle_matrix(angle_rad: f64, axis: &Vec3) -> Mat3 {
    let a = normalize(axis);
    let (s, c) = angle_rad.sin_cos();
    let k = [[0.0, a[2], -a[1]], [-a[2], 0.0, a[0]], [a[1], -a[0], 0.0]];
    let mut r = [[0.0; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            r[i][j] = (1.0 - c) * a[i] * a[j] + c * IDENTITY[i][j] + s * k[i][j];
        }
    }
    r
}

/// Batched [`axis_angle_matrix`].
pub fn axis_angle_matrices(angles_rad: &[f64], axis: Axis) -> Vec<Mat3> {
    angles_rad
        .iter()
        .map(|&angle| axis_angle_matrix(angle, axis))
        .collect()
}

/// Batched [`axis_vector_angle_matrix`]; a length-1 side broadcasts.
pub fn axis_vector_angle_matrices(angles_rad: &[f64], axes: &[Vec3]) -> Option<Vec<Mat3>> {
    let n = broadcast_len(angles_rad.len(), axes.len())?;
    Some(
        (0..n)
            .map(|i| axis_vector_angle_matrix(*broadcast_get(angles_rad, i), broadcast_get(axes, i)))
            .collect(),
    )
}

/// The rotation taking the direction of `a` onto the direction of `b`.
///
/// Built as a rotation about `a × b` by `−arccos(â·b̂)`. Parallel inputs
/// give the identity. Anti-parallel inputs give a half turn about an axis
/// perpendicular to `a`.
pub fn vector_to_vector_matrix(a: &Vec3, b: &Vec3) -> Mat3 {
    let na = norm(a);
    let nb = norm(b);
    let axis = cross(a, b);
    let cos_angle = (dot(a, b) / (na * nb)).clamp(-1.0, 1.0);

    if norm(&axis) <= f64::EPSILON * na * nb {
        if cos_angle > 0.0 {
            return IDENTITY;
        }
        return axis_vector_angle_matrix(-std::f64::consts::PI, &perpendicular(a));
    }
    axis_vector_angle_matrix(-cos_angle.acos(), &axis)
}

/// Batched [`vector_to_vector_matrix`]; a length-1 side broadcasts.
pub fn vector_to_vector_matrices(a: &[Vec3], b: &[Vec3]) -> Option<Vec<Mat3>> {
    let n = broadcast_len(a.len(), b.len())?;
    Some(
        (0..n)
            .map(|i| vector_to_vector_matrix(broadcast_get(a, i), broadcast_get(b, i)))
            .collect(),
    )
}

/// Rotation about Z bringing the XY projection of `v` onto +X.
///
/// A vector along Z has no XY projection; the identity is returned.
pub fn xz_plane_matrix(v: &Vec3) -> Mat3 {
    if v[0] == 0.0 && v[1] == 0.0 {
        return IDENTITY;
    }
    axis_angle_matrix(v[1].atan2(v[0]), Axis::Z)
}

/// Batched [`xz_plane_matrix`].
pub fn xz_plane_matrices(v: &[Vec3]) -> Vec<Mat3> {
    v.iter().map(xz_plane_matrix).collect()
}

/// Unit vector perpendicular to `a`, crossed against the least-aligned basis axis.
fn perpendicular(a: &Vec3) -> Vec3 {
    let abs = [a[0].abs(), a[1].abs(), a[2].abs()];
    let basis = if abs[0] <= abs[1] && abs[0] <= abs[2] {
        X_AXIS
    } else if abs[1] <= abs[2] {
        [0.0, 1.0, 0.0]
    } else {
        [0.0, 0.0, 1.0]
    };
    normalize(&cross(a, &basis))
}

/// Heliocentric (HCC) → helioprojective Cartesian axis relabelling:
/// HPC_X = −HCC_Z, HPC_Y = HCC_X, HPC_Z = HCC_Y.
pub const HCC_TO_HPC: Mat3 = [[0.0, 0.0, -1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];

/// Heliocentric (HCC) → Stonyhurst-aligned axis relabelling applied before
/// the observer rotation: X' = HCC_Z, Y' = HCC_X, Z' = HCC_Y.
pub const HCC_TO_HGS_PERMUTATION: Mat3 = [[0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];

/// Rotate an ICRF vector into the J2000 mean ecliptic.
pub fn icrf_to_ecliptic(v: &Vec3) -> Vec3 {
    [
        v[0],
        COS_OBL * v[1] + SIN_OBL * v[2],
        -SIN_OBL * v[1] + COS_OBL * v[2],
    ]
}

/// Rotate a J2000 mean-ecliptic vector into the ICRF.
pub fn ecliptic_to_icrf(v: &Vec3) -> Vec3 {
    [
        v[0],
        COS_OBL * v[1] - SIN_OBL * v[2],
        SIN_OBL * v[1] + COS_OBL * v[2],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::{determinant, mat_vec, neg, orthonormality_error, Y_AXIS, Z_AXIS};
    use std::f64::consts::FRAC_PI_2;

    const EPS: f64 = 1e-12;

    fn assert_vec_close(a: &Vec3, b: &Vec3, tol: f64) {
        for i in 0..3 {
            assert!((a[i] - b[i]).abs() < tol, "component {i}: {a:?} vs {b:?}");
        }
    }

    #[test]
    fn z_rotation_is_passive() {
        let m = axis_angle_matrix(FRAC_PI_2, Axis::Z);
        // Axes turn +90°, so the old +Y direction is the new +X.
        assert_vec_close(&mat_vec(&m, &Y_AXIS), &X_AXIS, EPS);
    }

    #[test]
    fn named_axis_matches_rodrigues() {
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            let a = axis_angle_matrix(0.7, axis);
            let b = axis_vector_angle_matrix(0.7, &axis.unit());
            for i in 0..3 {
                assert_vec_close(&a[i], &b[i], EPS);
            }
        }
    }

    #[test]
    fn rodrigues_is_orthonormal() {
        let m = axis_vector_angle_matrix(1.234, &[0.3, -0.5, 0.8]);
        assert!(orthonormality_error(&m) < EPS);
        assert!((determinant(&m) - 1.0).abs() < EPS);
    }

    #[test]
    fn vector_to_vector_maps_a_onto_b() {
        let a = [1.0, 2.0, 3.0];
        let b = [-2.0, 0.5, 1.0];
        let m = vector_to_vector_matrix(&a, &b);
        let mapped = mat_vec(&m, &normalize(&a));
        assert_vec_close(&mapped, &normalize(&b), EPS);
        assert!(orthonormality_error(&m) < EPS);
    }

    #[test]
    fn vector_to_vector_parallel_is_identity() {
        for v in [[1.0, 0.0, 0.0], [0.3, -2.0, 7.0], [0.0, 0.0, -5.0]] {
            assert_eq!(vector_to_vector_matrix(&v, &v), IDENTITY);
            assert_eq!(vector_to_vector_matrix(&v, &[v[0] * 3.0, v[1] * 3.0, v[2] * 3.0]), IDENTITY);
        }
    }

    #[test]
    fn vector_to_vector_antiparallel_is_half_turn() {
        for v in [[1.0, 0.0, 0.0], [0.3, -2.0, 7.0], [0.0, 0.0, -5.0]] {
            let m = vector_to_vector_matrix(&v, &neg(&v));
            assert!(orthonormality_error(&m) < EPS);
            assert!((determinant(&m) - 1.0).abs() < EPS);
            assert_vec_close(&mat_vec(&m, &v), &neg(&v), 1e-12 * norm(&v));
        }
    }

    #[test]
    fn xz_plane_brings_vector_to_meridian() {
        let v = [-3.0, 4.0, 2.5];
        let m = xz_plane_matrix(&v);
        let r = mat_vec(&m, &v);
        assert!((r[0] - 5.0).abs() < EPS);
        assert!(r[1].abs() < EPS);
        assert!((r[2] - 2.5).abs() < EPS);
    }

    #[test]
    fn xz_plane_negative_x_is_half_turn_about_z() {
        let m = xz_plane_matrix(&[-2.0, 0.0, 1.0]);
        let r = mat_vec(&m, &[-2.0, 0.0, 1.0]);
        assert_vec_close(&r, &[2.0, 0.0, 1.0], EPS);
    }

    #[test]
    fn xz_plane_along_z_is_identity() {
        assert_eq!(xz_plane_matrix(&Z_AXIS), IDENTITY);
    }

    #[test]
    fn permutations_are_orthonormal() {
        assert_eq!(orthonormality_error(&HCC_TO_HPC), 0.0);
        assert_eq!(orthonormality_error(&HCC_TO_HGS_PERMUTATION), 0.0);
        // Observer on the HCC +Z axis looks along HPC +X towards Sun centre.
        assert_eq!(mat_vec(&HCC_TO_HPC, &[0.0, 0.0, -1.0]), X_AXIS);
    }

    #[test]
    fn batched_broadcasts_single_side() {
        let mats = vector_to_vector_matrices(&[X_AXIS], &[Y_AXIS, Z_AXIS, X_AXIS]).unwrap();
        assert_eq!(mats.len(), 3);
        assert_eq!(mats[2], IDENTITY);
        assert!(vector_to_vector_matrices(&[X_AXIS, Y_AXIS], &[X_AXIS; 3]).is_none());
        let rot = axis_vector_angle_matrices(&[0.1, 0.2], &[Z_AXIS]).unwrap();
        assert_eq!(rot[1], axis_vector_angle_matrix(0.2, &Z_AXIS));
    }

    #[test]
    fn ecliptic_roundtrip() {
        let v = [1.0e8, -2.0e7, 3.0e7];
        assert_vec_close(&ecliptic_to_icrf(&icrf_to_ecliptic(&v)), &v, 1e-6);
    }
}
