//! Error types for frame construction and coordinate transforms.

use helio_ephem::EphemerisError;
use helio_time::TimeError;
use thiserror::Error;

use crate::frame::FrameKind;

#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum TransformError {
    /// A frame attribute the geometry depends on is unset.
    #[error("{frame} frame needs `{attribute}` to perform this transformation")]
    MissingAttribute {
        frame: FrameKind,
        attribute: &'static str,
    },
    /// An observer given as a name where a position is required.
    #[error("observer `{0}` must be resolved to a coordinate before this transformation")]
    UnresolvedObserver(String),
    /// Two observers that cannot be compared.
    #[error("cannot compare observers {left} and {right}: both must be resolved coordinates")]
    IncompatibleObserver { left: String, right: String },
    /// Direction-only data where a Cartesian position is required.
    #[error("missing distance: {0}")]
    MissingDistance(&'static str),
    /// Attribute supplied to a frame kind that does not define it.
    #[error("{frame} frame has no `{attribute}` attribute")]
    InvalidAttribute {
        frame: FrameKind,
        attribute: &'static str,
    },
    /// Resolved observers must be heliographic Stonyhurst coordinates.
    #[error("observer must be a heliographic_stonyhurst coordinate, got {0}")]
    InvalidObserver(FrameKind),
    #[error("batch length {found} does not broadcast against {expected}")]
    ShapeMismatch { expected: usize, found: usize },
    #[error("coordinate data must hold at least one point")]
    EmptyData,
    #[error("unknown frame `{0}`")]
    UnknownFrame(String),
    #[error("unknown observer `{0}`")]
    UnknownObserver(String),
    #[error("no transform path from {from} to {to}")]
    NoPath { from: FrameKind, to: FrameKind },
    #[error("invalid transform config: {0}")]
    InvalidConfig(&'static str),
    #[error(transparent)]
    Ephemeris(#[from] EphemerisError),
    #[error(transparent)]
    Time(#[from] TimeError),
}
