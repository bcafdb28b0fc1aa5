//! Solar coordinate frames and the transforms between them.
//!
//! A [`TransformGraph`] holds one edge per ordered pair of [`FrameKind`]s
//! that has a direct transform, and finds the shortest path for every
//! other pair. Coordinates are batches of Cartesian points attached to a
//! [`Frame`] (a kind plus its validated obstime, observer and equinox).
//!
//! ```no_run
//! use helio_coords::{Coordinate, Frame, FrameKind, Observer, TransformConfig, TransformGraph};
//! use helio_ephem::EphemerisConfig;
//! use helio_time::Epoch;
//!
//! # fn main() -> Result<(), helio_coords::TransformError> {
//! let graph = TransformGraph::analytic(EphemerisConfig::default(), TransformConfig::default())?;
//! let t = Epoch::from_utc(2013, 4, 1, 0, 0, 0.0);
//! let hgs = Frame::at(FrameKind::HeliographicStonyhurst, t)?;
//! let point = Coordinate::on_surface(hgs, 30.0, 10.0, helio_coords::sun::RSUN_KM)?;
//!
//! let hpc = Frame::at(FrameKind::Helioprojective, t)?
//!     .with_observer(Observer::earth())?
//!     .resolve_observer(&graph)?;
//! let seen = point.transform_to(&graph, &hpc)?;
//! println!("{:?}", seen.spherical()[0]);
//! # Ok(())
//! # }
//! ```

pub mod context;
pub mod coordinate;
pub mod data;
pub mod docs;
pub mod error;
pub mod frame;
pub mod graph;
pub mod loopback;
pub mod observer;
pub mod sun;
mod transforms;

pub use context::{QueryStats, TransformContext};
pub use coordinate::Coordinate;
pub use data::CoordData;
pub use docs::{DiagramEdge, DiagramNode, GraphDiagram};
pub use error::TransformError;
pub use frame::{obstimes_match, Frame, FrameKind, ObsTime};
pub use graph::{
    AffineParts, AffineTransform, FunctionTransform, StepKind, TransformConfig, TransformGraph,
    TransformGraphBuilder, TransformStep,
};
pub use loopback::retime;
pub use observer::{observers_equal, resolve_observer, Observer};
pub use sun::{b0, carrington_longitude, earth_distance, get_earth};
pub use transforms::register_all;
