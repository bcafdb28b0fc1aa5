//! Keplerian mean elements for the major planets.
//!
//! Source: E.M. Standish, "Keplerian Elements for Approximate Positions of
//! the Major Planets" (JPL/SSD), Table 1, valid 1800 AD – 2050 AD. Elements
//! are referred to the J2000 mean ecliptic and equinox.

use helio_frames::{ecliptic_to_icrf, Vec3};

use crate::Body;

/// Astronomical unit in km (IAU 2012).
pub const AU_KM: f64 = 149_597_870.7;

/// Mean elements at J2000 and their rates per Julian century.
///
/// Order: a (au), e, I (deg), L (deg), ϖ (deg), Ω (deg).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanElements {
    pub at_j2000: [f64; 6],
    pub per_century: [f64; 6],
    /// Sun mass / (planet + satellites) mass.
    pub sun_mass_ratio: f64,
}

/// The eight planetary orbits, with the Earth-Moon barycentre for Earth.
pub const PLANETS: [(Body, MeanElements); 8] = [
    (
        Body::Mercury,
        MeanElements {
            at_j2000: [0.38709927, 0.20563593, 7.00497902, 252.25032350, 77.45779628, 48.33076593],
            per_century: [0.00000037, 0.00001906, -0.00594749, 149472.67411175, 0.16047689, -0.12534081],
            sun_mass_ratio: 6_023_600.0,
        },
    ),
    (
        Body::Venus,
        MeanElements {
            at_j2000: [0.72333566, 0.00677672, 3.39467605, 181.97909950, 131.60246718, 76.67984255],
            per_century: [0.00000390, -0.00004107, -0.00078890, 58517.81538729, 0.00268329, -0.27769418],
            sun_mass_ratio: 408_523.71,
        },
    ),
    (
        Body::EarthMoonBarycenter,
        MeanElements {
            at_j2000: [1.00000261, 0.01671123, -0.00001531, 100.46457166, 102.93768193, 0.0],
            per_century: [0.00000562, -0.00004392, -0.01294668, 35999.37244981, 0.32327364, 0.0],
            sun_mass_ratio: 328_900.56,
        },
    ),
    (
        Body::Mars,
        MeanElements {
            at_j2000: [1.52371034, 0.09339410, 1.84969142, -4.55343205, -23.94362959, 49.55953891],
            per_century: [0.00001847, 0.00007882, -0.00813131, 19140.30268499, 0.44441088, -0.29257343],
            sun_mass_ratio: 3_098_708.0,
        },
    ),
    (
        Body::Jupiter,
        MeanElements {
            at_j2000: [5.20288700, 0.04838624, 1.30439695, 34.39644051, 14.72847983, 100.47390909],
            per_century: [-0.00011607, -0.00013253, -0.00183714, 3034.74612775, 0.21252668, 0.20469106],
            sun_mass_ratio: 1_047.3486,
        },
    ),
    (
        Body::Saturn,
        MeanElements {
            at_j2000: [9.53667594, 0.05386179, 2.48599187, 49.95424423, 92.59887831, 113.66242448],
            per_century: [-0.00125060, -0.00050991, 0.00193609, 1222.49362201, -0.41897216, -0.28867794],
            sun_mass_ratio: 3_497.898,
        },
    ),
    (
        Body::Uranus,
        MeanElements {
            at_j2000: [19.18916464, 0.04725744, 0.77263783, 313.23810451, 170.95427630, 74.01692503],
            per_century: [-0.00196176, -0.00004397, -0.00242939, 428.48202785, 0.40805281, 0.04240589],
            sun_mass_ratio: 22_902.98,
        },
    ),
    (
        Body::Neptune,
        MeanElements {
            at_j2000: [30.06992276, 0.00859048, 1.77004347, -55.12002969, 44.96476227, 131.78422574],
            per_century: [0.00026291, 0.00005105, 0.00035372, 218.45945325, -0.32241464, -0.00508664],
            sun_mass_ratio: 19_412.24,
        },
    ),
];

/// Mean elements for a planet (the Earth-Moon barycentre stands in for Earth).
pub fn elements(body: Body) -> Option<&'static MeanElements> {
    PLANETS.iter().find(|(b, _)| *b == body).map(|(_, el)| el)
}

/// Solve Kepler's equation `M = E − e sin E` (radians) by Newton iteration.
pub fn eccentric_anomaly(mean_anomaly: f64, e: f64) -> f64 {
    let mut ecc = mean_anomaly + e * mean_anomaly.sin();
    for _ in 0..30 {
        let delta = (mean_anomaly - (ecc - e * ecc.sin())) / (1.0 - e * ecc.cos());
        ecc += delta;
        if delta.abs() < 1e-15 {
            break;
        }
    }
    ecc
}

impl MeanElements {
    /// Heliocentric ICRF position in km at `t` Julian centuries TDB past J2000.
    pub fn heliocentric_position(&self, t: f64) -> Vec3 {
        let el: [f64; 6] = std::array::from_fn(|i| self.at_j2000[i] + self.per_century[i] * t);
        let [a, e, incl, mean_lon, peri_lon, node] = el;

        let mean_anomaly = (mean_lon - peri_lon + 180.0).rem_euclid(360.0) - 180.0;
        let ecc = eccentric_anomaly(mean_anomaly.to_radians(), e);

        // Position in the orbital plane, x toward perihelion.
        let xp = a * (ecc.cos() - e);
        let yp = a * (1.0 - e * e).sqrt() * ecc.sin();

        let (so, co) = (peri_lon - node).to_radians().sin_cos();
        let (sn, cn) = node.to_radians().sin_cos();
        let (si, ci) = incl.to_radians().sin_cos();

        let ecliptic = [
            ((co * cn - so * sn * ci) * xp + (-so * cn - co * sn * ci) * yp) * AU_KM,
            ((co * sn + so * cn * ci) * xp + (-so * sn + co * cn * ci) * yp) * AU_KM,
            (so * si * xp + co * si * yp) * AU_KM,
        ];
        ecliptic_to_icrf(&ecliptic)
    }
}
