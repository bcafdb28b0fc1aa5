//! UTC → TAI → TT → TDB conversion chain and its inverse.
//!
//! All values are seconds past J2000.0 in the named scale.
//! TDB − TT uses the single periodic term of the NAIF model:
//! `K sin(E)`, `E = M + EB sin(M)`, `M = M0 + M1 · t`.

use crate::lsk::LskData;

/// UTC → TAI.
pub fn utc_to_tai(utc_s: f64, lsk: &LskData) -> f64 {
    utc_s + lsk.delta_at(utc_s)
}

/// TAI → UTC. Iterates once to pick the offset valid at the UTC instant.
pub fn tai_to_utc(tai_s: f64, lsk: &LskData) -> f64 {
    let guess = tai_s - lsk.delta_at(tai_s);
    tai_s - lsk.delta_at(guess)
}

/// TAI → TT.
pub fn tai_to_tt(tai_s: f64, lsk: &LskData) -> f64 {
    tai_s + lsk.delta_t_a
}

/// TT → TAI.
pub fn tt_to_tai(tt_s: f64, lsk: &LskData) -> f64 {
    tt_s - lsk.delta_t_a
}

/// TDB − TT at a TT epoch.
pub fn tdb_minus_tt(tt_s: f64, lsk: &LskData) -> f64 {
    let m = lsk.m0 + lsk.m1 * tt_s;
    let e = m + lsk.eb * m.sin();
    lsk.k * e.sin()
}

/// TT → TDB.
pub fn tt_to_tdb(tt_s: f64, lsk: &LskData) -> f64 {
    tt_s + tdb_minus_tt(tt_s, lsk)
}

/// TDB → TT (fixed-point iteration, converges to sub-nanosecond in three steps).
pub fn tdb_to_tt(tdb_s: f64, lsk: &LskData) -> f64 {
    let mut tt = tdb_s;
    for _ in 0..3 {
        tt = tdb_s - tdb_minus_tt(tt, lsk);
    }
    tt
}

/// UTC → TDB.
pub fn utc_to_tdb(utc_s: f64, lsk: &LskData) -> f64 {
    tt_to_tdb(tai_to_tt(utc_to_tai(utc_s, lsk), lsk), lsk)
}

/// TDB → UTC.
pub fn tdb_to_utc(tdb_s: f64, lsk: &LskData) -> f64 {
    tai_to_utc(tt_to_tai(tdb_to_tt(tdb_s, lsk), lsk), lsk)
}
