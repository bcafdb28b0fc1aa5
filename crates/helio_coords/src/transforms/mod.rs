//! Pairwise transform functions and their registration.
//!
//! - [`builtin`]: ICRS, HCRS and heliocentric mean ecliptic, the general
//!   celestial frames the solar frames hang off.
//! - [`heliographic`]: HCRS ↔ HGS and HGS ↔ HGC.
//! - [`heliocentric`]: the observer-dependent HCC and HPC.
//! - [`ecliptic`]: HEE, GSE, HCI and GEI.

pub(crate) mod builtin;
pub(crate) mod ecliptic;
pub(crate) mod heliocentric;
pub(crate) mod heliographic;

use crate::frame::FrameKind::{self, *};
use crate::graph::{TransformGraphBuilder, TransformStep};
use crate::graph::TransformStep::{Affine, FiniteDifference};

/// Edges among the general celestial frames.
pub const GENERIC_EDGES: &[(FrameKind, FrameKind, TransformStep)] = &[
    (Icrs, Hcrs, Affine(builtin::icrs_to_hcrs)),
    (Hcrs, Icrs, Affine(builtin::hcrs_to_icrs)),
    (Hcrs, Hcrs, FiniteDifference(builtin::hcrs_to_hcrs)),
    (Icrs, HeliocentricMeanEcliptic, Affine(builtin::icrs_to_hme)),
    (HeliocentricMeanEcliptic, Icrs, Affine(builtin::hme_to_icrs)),
    (HeliocentricMeanEcliptic, HeliocentricMeanEcliptic, FiniteDifference(builtin::hme_to_hme)),
];

/// Edges into, out of and among the solar frames.
pub const SOLAR_EDGES: &[(FrameKind, FrameKind, TransformStep)] = &[
    (HeliographicStonyhurst, HeliographicCarrington, FiniteDifference(heliographic::hgs_to_hgc)),
    (HeliographicCarrington, HeliographicStonyhurst, FiniteDifference(heliographic::hgc_to_hgs)),
    (Heliocentric, Helioprojective, FiniteDifference(heliocentric::hcc_to_hpc)),
    (Helioprojective, Heliocentric, FiniteDifference(heliocentric::hpc_to_hcc)),
    (Heliocentric, HeliographicStonyhurst, FiniteDifference(heliocentric::hcc_to_hgs)),
    (HeliographicStonyhurst, Heliocentric, FiniteDifference(heliocentric::hgs_to_hcc)),
    (Helioprojective, Helioprojective, FiniteDifference(heliocentric::hpc_to_hpc)),
    (Hcrs, HeliographicStonyhurst, Affine(heliographic::hcrs_to_hgs)),
    (HeliographicStonyhurst, Hcrs, Affine(heliographic::hgs_to_hcrs)),
    (HeliographicStonyhurst, HeliographicStonyhurst, FiniteDifference(heliographic::hgs_to_hgs)),
    (HeliographicCarrington, HeliographicCarrington, FiniteDifference(heliographic::hgc_to_hgc)),
    (Heliocentric, Heliocentric, FiniteDifference(heliocentric::hcc_to_hcc)),
    (HeliocentricMeanEcliptic, HeliocentricEarthEcliptic, FiniteDifference(ecliptic::hme_to_hee)),
    (HeliocentricEarthEcliptic, HeliocentricMeanEcliptic, FiniteDifference(ecliptic::hee_to_hme)),
    (HeliocentricEarthEcliptic, HeliocentricEarthEcliptic, FiniteDifference(ecliptic::hee_to_hee)),
    (HeliocentricEarthEcliptic, GeocentricSolarEcliptic, FiniteDifference(ecliptic::hee_to_gse)),
    (GeocentricSolarEcliptic, HeliocentricEarthEcliptic, FiniteDifference(ecliptic::gse_to_hee)),
    (GeocentricSolarEcliptic, GeocentricSolarEcliptic, FiniteDifference(ecliptic::gse_to_gse)),
    (HeliocentricMeanEcliptic, HeliocentricInertial, FiniteDifference(ecliptic::hme_to_hci)),
    (HeliocentricInertial, HeliocentricMeanEcliptic, FiniteDifference(ecliptic::hci_to_hme)),
    (HeliocentricInertial, HeliocentricInertial, FiniteDifference(ecliptic::hci_to_hci)),
    (HeliocentricMeanEcliptic, GeocentricEarthEquatorial, FiniteDifference(ecliptic::hme_to_gei)),
    (GeocentricEarthEquatorial, HeliocentricMeanEcliptic, FiniteDifference(ecliptic::gei_to_hme)),
    (GeocentricEarthEquatorial, GeocentricEarthEquatorial, FiniteDifference(ecliptic::gei_to_gei)),
];

/// Register the general celestial edges, then the solar ones.
pub fn register_all(builder: TransformGraphBuilder) -> TransformGraphBuilder {
    GENERIC_EDGES
        .iter()
        .chain(SOLAR_EDGES)
        .fold(builder, |b, &(from, to, step)| b.register(from, to, step))
}
