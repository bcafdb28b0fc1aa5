//! Geometry for solar coordinate frames.
//!
//! Provides `[f64; 3]` vector and 3×3 matrix algebra, the rotation-matrix
//! kernel (named-axis and Rodrigues rotations, vector-to-vector alignment,
//! XZ-meridian alignment, fixed axis permutations), Cartesian ↔ spherical
//! conversion, IAU 2006 obliquity and precession.

pub mod obliquity;
pub mod precession;
pub mod rotation;
pub mod spherical;
pub mod vector;

pub use obliquity::{
    mean_obliquity_rad, ARCSEC_TO_RAD, COS_OBL, OBLIQUITY_J2000_DEG, OBLIQUITY_J2000_RAD, SIN_OBL,
};
pub use precession::{
    fukushima_williams_angles, general_precession_longitude_deg, mean_ecliptic_matrix,
};
pub use rotation::{
    axis_angle_matrices, axis_angle_matrix, axis_vector_angle_matrices, axis_vector_angle_matrix,
    ecliptic_to_icrf, icrf_to_ecliptic, vector_to_vector_matrices, vector_to_vector_matrix,
    xz_plane_matrices, xz_plane_matrix, Axis, HCC_TO_HGS_PERMUTATION, HCC_TO_HPC,
};
pub use spherical::{
    cartesian_state_to_spherical_state, cartesian_to_spherical, spherical_to_cartesian,
    unit_vector, wrap_longitude_deg, SphericalCoords, SphericalState,
};
pub use vector::{Mat3, Vec3, IDENTITY, X_AXIS, Y_AXIS, Z_AXIS};
