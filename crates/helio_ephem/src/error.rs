//! Error types for ephemeris queries.

use thiserror::Error;

use crate::Body;

#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum EphemerisError {
    #[error("invalid ephemeris config: {0}")]
    InvalidConfig(&'static str),
    #[error("epoch JD {jd_tdb} (TDB) is outside the {body} ephemeris range")]
    EpochOutOfRange { body: Body, jd_tdb: f64 },
    #[error("epoch must be finite")]
    NonFiniteEpoch,
    #[error("unknown body `{0}`")]
    UnknownBody(String),
}
