//! Plain-array 3-vector and 3×3 matrix algebra.
//!
//! Vectors are `[f64; 3]`; matrices are row-major `[[f64; 3]; 3]`.

/// A Cartesian 3-vector.
pub type Vec3 = [f64; 3];

/// A row-major 3×3 matrix.
pub type Mat3 = [[f64; 3]; 3];

pub const IDENTITY: Mat3 = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

pub const X_AXIS: Vec3 = [1.0, 0.0, 0.0];
pub const Y_AXIS: Vec3 = [0.0, 1.0, 0.0];
pub const Z_AXIS: Vec3 = [0.0, 0.0, 1.0];

pub fn add(a: &Vec3, b: &Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

pub fn sub(a: &Vec3, b: &Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

pub fn scale(a: &Vec3, k: f64) -> Vec3 {
    [a[0] * k, a[1] * k, a[2] * k]
}

pub fn neg(a: &Vec3) -> Vec3 {
    [-a[0], -a[1], -a[2]]
}

pub fn dot(a: &Vec3, b: &Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub fn cross(a: &Vec3, b: &Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

pub fn norm(a: &Vec3) -> f64 {
    dot(a, a).sqrt()
}

/// Unit vector along `a`; the zero vector is returned unchanged.
pub fn normalize(a: &Vec3) -> Vec3 {
    let n = norm(a);
    if n == 0.0 { *a } else { scale(a, 1.0 / n) }
}

/// `m · v`.
pub fn mat_vec(m: &Mat3, v: &Vec3) -> Vec3 {
    [dot(&m[0], v), dot(&m[1], v), dot(&m[2], v)]
}

/// `a · b`.
pub fn mat_mul(a: &Mat3, b: &Mat3) -> Mat3 {
    let mut out = [[0.0; 3]; 3];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = a[i][0] * b[0][j] + a[i][1] * b[1][j] + a[i][2] * b[2][j];
        }
    }
    out
}

pub fn transpose(m: &Mat3) -> Mat3 {
    [
        [m[0][0], m[1][0], m[2][0]],
        [m[0][1], m[1][1], m[2][1]],
        [m[0][2], m[1][2], m[2][2]],
    ]
}

pub fn determinant(m: &Mat3) -> f64 {
    dot(&m[0], &cross(&m[1], &m[2]))
}

/// Largest absolute element of `m · mᵀ − I`.
pub fn orthonormality_error(m: &Mat3) -> f64 {
    let p = mat_mul(m, &transpose(m));
    let mut worst: f64 = 0.0;
    for (i, row) in p.iter().enumerate() {
        for (j, v) in row.iter().enumerate() {
            worst = worst.max((v - IDENTITY[i][j]).abs());
        }
    }
    worst
}

/// Common length of two batches where a length of 1 broadcasts.
pub fn broadcast_len(a: usize, b: usize) -> Option<usize> {
    match (a, b) {
        (a, b) if a == b => Some(a),
        (1, b) => Some(b),
        (a, 1) => Some(a),
        _ => None,
    }
}

/// Element `i` of a batch of length 1 or N.
pub fn broadcast_get<T>(items: &[T], i: usize) -> &T {
    if items.len() == 1 { &items[0] } else { &items[i] }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-15;

    #[test]
    fn cross_of_basis() {
        assert_eq!(cross(&X_AXIS, &Y_AXIS), Z_AXIS);
        assert_eq!(cross(&Y_AXIS, &Z_AXIS), X_AXIS);
    }

    #[test]
    fn mat_mul_identity() {
        let m = [[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 10.0]];
        assert_eq!(mat_mul(&m, &IDENTITY), m);
        assert_eq!(mat_mul(&IDENTITY, &m), m);
    }

    #[test]
    fn transpose_twice() {
        let m = [[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]];
        assert_eq!(transpose(&transpose(&m)), m);
        assert_eq!(transpose(&m)[0][2], 7.0);
    }

    #[test]
    fn normalize_zero_is_zero() {
        assert_eq!(normalize(&[0.0; 3]), [0.0; 3]);
        let u = normalize(&[3.0, 0.0, 4.0]);
        assert!((norm(&u) - 1.0).abs() < EPS);
    }

    #[test]
    fn determinant_of_identity() {
        assert_eq!(determinant(&IDENTITY), 1.0);
        assert_eq!(orthonormality_error(&IDENTITY), 0.0);
    }

    #[test]
    fn broadcasting_rules() {
        assert_eq!(broadcast_len(4, 4), Some(4));
        assert_eq!(broadcast_len(1, 4), Some(4));
        assert_eq!(broadcast_len(4, 1), Some(4));
        assert_eq!(broadcast_len(3, 4), None);
        let items = [10, 20, 30];
        assert_eq!(*broadcast_get(&items, 2), 30);
        assert_eq!(*broadcast_get(&[7], 2), 7);
    }
}
