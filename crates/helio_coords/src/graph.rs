//! The transform graph: a table of edges keyed by (source, destination)
//! frame kind, with precomputed shortest paths for pairs that have no
//! direct edge.
//!
//! Edges come in three flavours:
//!
//! - [`TransformStep::Function`]: a function producing the destination
//!   coordinate directly.
//! - [`TransformStep::FiniteDifference`]: a function that only handles
//!   positions; velocities are obtained by transforming the position
//!   ±dt/2 along the input velocity (with both obstimes shifted by the
//!   same amount) and differencing.
//! - [`TransformStep::Affine`]: a function returning rotation matrices and
//!   an optional origin offset (with optional offset velocity), applied
//!   by the graph.

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::fmt::{self, Formatter};
use std::sync::Arc;

use helio_ephem::{EphemerisConfig, EphemerisProvider, KeplerianEphemeris};
use helio_frames::vector::{broadcast_get, broadcast_len, mat_vec, neg, sub, transpose};
use helio_frames::{Mat3, Vec3};
use tracing::{debug, debug_span, trace};

use crate::context::{QueryStats, TransformContext};
use crate::coordinate::Coordinate;
use crate::data::CoordData;
use crate::docs::GraphDiagram;
use crate::error::TransformError;
use crate::frame::{Frame, FrameKind};
use crate::sun::RSUN_KM;
use crate::transforms;

/// Default finite-difference step for velocity propagation.
pub const DEFAULT_FINITE_DIFFERENCE_DT_S: f64 = 1.0;
/// Default relative tolerance when comparing observers.
pub const DEFAULT_OBSERVER_RTOL: f64 = 1e-5;

/// Transform behaviour knobs.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformConfig {
    /// Full width of the finite-difference step (seconds).
    pub finite_difference_dt_s: f64,
    /// Relative tolerance for observer lon/lat/radius equality.
    pub observer_rtol: f64,
    /// Solar radius used for distance estimation.
    pub rsun_km: f64,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            finite_difference_dt_s: DEFAULT_FINITE_DIFFERENCE_DT_S,
            observer_rtol: DEFAULT_OBSERVER_RTOL,
            rsun_km: RSUN_KM,
        }
    }
}

impl TransformConfig {
    pub fn validate(&self) -> Result<(), TransformError> {
        if !(self.finite_difference_dt_s.is_finite() && self.finite_difference_dt_s > 0.0) {
            return Err(TransformError::InvalidConfig(
                "finite_difference_dt_s must be positive and finite",
            ));
        }
        if !(self.observer_rtol.is_finite() && self.observer_rtol >= 0.0) {
            return Err(TransformError::InvalidConfig(
                "observer_rtol must be non-negative and finite",
            ));
        }
        if !(self.rsun_km.is_finite() && self.rsun_km > 0.0) {
            return Err(TransformError::InvalidConfig("rsun_km must be positive and finite"));
        }
        Ok(())
    }
}

pub type FunctionTransform =
    fn(&mut TransformContext<'_>, &Coordinate, &Frame) -> Result<Coordinate, TransformError>;

/// Computes the affine parts for (source frame, destination frame,
/// whether velocities are present).
pub type AffineTransform =
    fn(&mut TransformContext<'_>, &Frame, &Frame, bool) -> Result<AffineParts, TransformError>;

/// One registered edge.
#[derive(Debug, Clone, Copy)]
pub enum TransformStep {
    Function(FunctionTransform),
    FiniteDifference(FunctionTransform),
    Affine(AffineTransform),
}

impl TransformStep {
    pub fn kind(&self) -> StepKind {
        match self {
            Self::Function(_) => StepKind::Function,
            Self::FiniteDifference(_) => StepKind::FiniteDifference,
            Self::Affine(_) => StepKind::Affine,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StepKind {
    Function,
    FiniteDifference,
    Affine,
}

impl StepKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Function => "FunctionTransform",
            Self::FiniteDifference => "FunctionTransformWithFiniteDifference",
            Self::Affine => "AffineTransform",
        }
    }

    /// Edge colour in rendered diagrams.
    pub const fn color(self) -> &'static str {
        match self {
            Self::Function => "#783001",
            Self::FiniteDifference => "#d95f02",
            Self::Affine => "#555555",
        }
    }
}

/// Rotation and origin shift produced by an affine edge.
///
/// Applied as `x' = M·x + offset` (and `v' = M·v + offset_velocity`).
/// Each field holds one entry, or one per point.
#[derive(Debug, Clone, PartialEq)]
pub struct AffineParts {
    pub matrices: Vec<Mat3>,
    pub offsets: Option<Vec<Vec3>>,
    pub offset_velocities: Option<Vec<Vec3>>,
}

impl AffineParts {
    /// Reverse map: transposed matrices, offsets negated and rotated back.
    pub fn inverse(&self) -> Self {
        let matrices: Vec<Mat3> = self.matrices.iter().map(transpose).collect();
        let undo = |offsets: &Vec<Vec3>| -> Vec<Vec3> {
            let n = broadcast_len(matrices.len(), offsets.len()).unwrap_or(offsets.len());
            (0..n)
                .map(|i| mat_vec(broadcast_get(&matrices, i), &neg(broadcast_get(offsets, i))))
                .collect()
        };
        Self {
            offsets: self.offsets.as_ref().map(undo),
            offset_velocities: self.offset_velocities.as_ref().map(undo),
            matrices,
        }
    }

    fn apply(&self, data: &CoordData) -> Result<CoordData, TransformError> {
        let mut out = data.rotated(&self.matrices)?;
        if let Some(offsets) = &self.offsets
            && offsets.iter().any(|o| *o != [0.0; 3])
        {
            out = out.translated(offsets, "shifting the frame origin")?;
        }
        if let Some(dv) = &self.offset_velocities {
            out = out.with_velocity_offset(dv)?;
        }
        Ok(out)
    }
}

/// Frame kinds and the edges between them.
///
/// `TransformGraph` is [`Send`] + [`Sync`] and never mutated after
/// [`TransformGraphBuilder::build`]; share it across threads with `Arc`.
/// Each transform call creates its own [`TransformContext`].
pub struct TransformGraph {
    edges: BTreeMap<(FrameKind, FrameKind), TransformStep>,
    paths: HashMap<(FrameKind, FrameKind), Vec<FrameKind>>,
    ephemeris: Arc<dyn EphemerisProvider>,
    config: TransformConfig,
}

// Manual Debug impl since the provider is a trait object.
impl fmt::Debug for TransformGraph {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformGraph")
            .field("edge_count", &self.edges.len())
            .field("ephemeris", &self.ephemeris.name())
            .field("config", &self.config)
            .finish()
    }
}

impl TransformGraph {
    pub fn builder(ephemeris: Arc<dyn EphemerisProvider>) -> TransformGraphBuilder {
        TransformGraphBuilder {
            edges: BTreeMap::new(),
            ephemeris,
            config: TransformConfig::default(),
        }
    }

    /// Every built-in edge, backed by `ephemeris`.
    pub fn standard(
        ephemeris: Arc<dyn EphemerisProvider>,
        config: TransformConfig,
    ) -> Result<Self, TransformError> {
        transforms::register_all(Self::builder(ephemeris).config(config)).build()
    }

    /// Every built-in edge, backed by the analytic ephemeris.
    pub fn analytic(
        ephemeris: EphemerisConfig,
        config: TransformConfig,
    ) -> Result<Self, TransformError> {
        let provider = KeplerianEphemeris::new(ephemeris)?;
        Self::standard(Arc::new(provider), config)
    }

    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    pub fn ephemeris(&self) -> &dyn EphemerisProvider {
        self.ephemeris.as_ref()
    }

    /// Direct edge, if registered.
    pub fn edge(&self, from: FrameKind, to: FrameKind) -> Option<TransformStep> {
        self.edges.get(&(from, to)).copied()
    }

    pub fn edges(&self) -> impl Iterator<Item = (FrameKind, FrameKind, StepKind)> + '_ {
        self.edges.iter().map(|(&(a, b), step)| (a, b, step.kind()))
    }

    /// Kinds that appear on at least one edge.
    pub fn kinds(&self) -> BTreeSet<FrameKind> {
        self.edges.keys().flat_map(|&(a, b)| [a, b]).collect()
    }

    /// Shortest hop sequence from `from` to `to`, both ends included.
    pub fn path(&self, from: FrameKind, to: FrameKind) -> Result<&[FrameKind], TransformError> {
        self.paths
            .get(&(from, to))
            .map(Vec::as_slice)
            .ok_or(TransformError::NoPath { from, to })
    }

    /// A fresh per-request context, for callers that want to share the
    /// ephemeris cache across several transforms.
    pub fn context(&self) -> TransformContext<'_> {
        TransformContext::new(self)
    }

    /// Re-express `coord` in `to`.
    pub fn transform(&self, coord: &Coordinate, to: &Frame) -> Result<Coordinate, TransformError> {
        let mut ctx = TransformContext::new(self);
        self.transform_top(&mut ctx, coord, to)
    }

    /// Transform and return telemetry alongside the result.
    pub fn transform_with_stats(
        &self,
        coord: &Coordinate,
        to: &Frame,
    ) -> Result<(Coordinate, QueryStats), TransformError> {
        let mut ctx = TransformContext::new(self);
        let out = self.transform_top(&mut ctx, coord, to)?;
        Ok((out, ctx.stats()))
    }

    /// A disposable copy of the topology for rendering.
    pub fn diagram(&self) -> GraphDiagram {
        GraphDiagram::from_edges(self.edges())
    }

    fn transform_top(
        &self,
        ctx: &mut TransformContext<'_>,
        coord: &Coordinate,
        to: &Frame,
    ) -> Result<Coordinate, TransformError> {
        let _span = debug_span!("transform", from = %coord.kind(), to = %to.kind()).entered();
        self.transform_in(ctx, coord, to)
    }

    pub(crate) fn transform_in(
        &self,
        ctx: &mut TransformContext<'_>,
        coord: &Coordinate,
        to: &Frame,
    ) -> Result<Coordinate, TransformError> {
        let (from_kind, to_kind) = (coord.kind(), to.kind());
        if from_kind == to_kind {
            return match self.edge(from_kind, to_kind) {
                Some(step) => apply_step(ctx, step, coord, to),
                None => Coordinate::realize(to, coord.data().clone()),
            };
        }

        let path = self.path(from_kind, to_kind)?;
        debug!(from = %from_kind, to = %to_kind, hops = path.len() - 1, "transform path");
        let mut current = coord.clone();
        for (i, hop) in path.windows(2).enumerate() {
            let step = self.edge(hop[0], hop[1]).ok_or(TransformError::NoPath {
                from: hop[0],
                to: hop[1],
            })?;
            let frame = if i + 2 == path.len() {
                to.clone()
            } else {
                Frame::merged(hop[1], coord.frame(), to)
            };
            current = apply_step(ctx, step, &current, &frame)?;
        }
        Ok(current)
    }
}

fn apply_step(
    ctx: &mut TransformContext<'_>,
    step: TransformStep,
    coord: &Coordinate,
    to: &Frame,
) -> Result<Coordinate, TransformError> {
    ctx.stats.edges += 1;
    trace!(from = %coord.kind(), to = %to.kind(), step = step.kind().name(), "edge");
    match step {
        TransformStep::Function(f) => f(ctx, coord, to),
        TransformStep::FiniteDifference(f) => finite_difference(ctx, f, coord, to),
        TransformStep::Affine(f) => {
            let parts = f(ctx, coord.frame(), to, coord.velocities().is_some())?;
            Coordinate::realize(to, parts.apply(coord.data())?)
        }
    }
}

fn finite_difference(
    ctx: &mut TransformContext<'_>,
    f: FunctionTransform,
    coord: &Coordinate,
    to: &Frame,
) -> Result<Coordinate, TransformError> {
    if coord.velocities().is_none() {
        return f(ctx, coord, to);
    }
    let dt = ctx.config().finite_difference_dt_s;
    let half = dt / 2.0;

    let base = f(ctx, &coord.without_velocities(), to)?;
    let mut probe = |sign: f64| -> Result<Coordinate, TransformError> {
        let moved = Coordinate::new(
            coord.frame().shifted(sign * half),
            coord.data().advanced(sign * half),
        )?;
        f(ctx, &moved, &to.shifted(sign * half))
    };
    let ahead = probe(1.0)?;
    let behind = probe(-1.0)?;

    let n = base.len();
    let velocities = (0..n)
        .map(|i| {
            let d = sub(broadcast_get(ahead.cartesian(), i), broadcast_get(behind.cartesian(), i));
            [d[0] / dt, d[1] / dt, d[2] / dt]
        })
        .collect();
    let data = base.data().clone().with_velocities(velocities)?;
    Coordinate::realize(base.frame(), data)
}

/// Accumulates edges, then freezes them into a [`TransformGraph`].
pub struct TransformGraphBuilder {
    edges: BTreeMap<(FrameKind, FrameKind), TransformStep>,
    ephemeris: Arc<dyn EphemerisProvider>,
    config: TransformConfig,
}

impl TransformGraphBuilder {
    pub fn config(mut self, config: TransformConfig) -> Self {
        self.config = config;
        self
    }

    /// Register (or replace) the edge `from → to`.
    pub fn register(mut self, from: FrameKind, to: FrameKind, step: TransformStep) -> Self {
        if self.edges.insert((from, to), step).is_some() {
            debug!(%from, %to, "replaced transform edge");
        }
        self
    }

    /// Validate the config and precompute shortest paths.
    pub fn build(self) -> Result<TransformGraph, TransformError> {
        self.config.validate()?;
        let mut paths = HashMap::new();
        let nodes: BTreeSet<FrameKind> = self.edges.keys().flat_map(|&(a, b)| [a, b]).collect();
        for &from in &nodes {
            for (to, path) in shortest_paths(&self.edges, from) {
                paths.insert((from, to), path);
            }
        }
        debug!(edges = self.edges.len(), nodes = nodes.len(), "transform graph built");
        Ok(TransformGraph {
            edges: self.edges,
            paths,
            ephemeris: self.ephemeris,
            config: self.config,
        })
    }
}

/// Breadth-first shortest paths from `from` to every reachable kind.
/// Neighbours are visited in kind order, so ties resolve deterministically.
fn shortest_paths(
    edges: &BTreeMap<(FrameKind, FrameKind), TransformStep>,
    from: FrameKind,
) -> Vec<(FrameKind, Vec<FrameKind>)> {
    let mut parent: HashMap<FrameKind, FrameKind> = HashMap::new();
    let mut seen = BTreeSet::from([from]);
    let mut queue = VecDeque::from([from]);
    let mut out = vec![(from, vec![from])];

    while let Some(node) = queue.pop_front() {
        let neighbours = edges
            .keys()
            .filter(|&&(a, b)| a == node && b != node)
            .map(|&(_, b)| b);
        for next in neighbours {
            if !seen.insert(next) {
                continue;
            }
            parent.insert(next, node);
            queue.push_back(next);

            let mut path = vec![next];
            let mut cur = next;
            while let Some(&p) = parent.get(&cur) {
                path.push(p);
                cur = p;
            }
            path.reverse();
            out.push((next, path));
        }
    }
    out
}

// Compile-time assertion that the graph can be shared across threads.
#[allow(dead_code)]
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn check() {
        assert_send_sync::<TransformGraph>();
    }
};

#[cfg(test)]
mod tests {
    use super::*;
    use FrameKind::*;

    fn graph() -> TransformGraph {
        TransformGraph::analytic(EphemerisConfig::default(), TransformConfig::default()).unwrap()
    }

    #[test]
    fn config_validation() {
        assert!(TransformConfig::default().validate().is_ok());
        let bad = TransformConfig {
            finite_difference_dt_s: 0.0,
            ..TransformConfig::default()
        };
        assert!(matches!(bad.validate(), Err(TransformError::InvalidConfig(_))));
        let bad = TransformConfig {
            rsun_km: f64::NAN,
            ..TransformConfig::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn every_kind_reaches_every_other() {
        let g = graph();
        assert_eq!(g.kinds().len(), FrameKind::ALL.len());
        for a in FrameKind::ALL {
            for b in FrameKind::ALL {
                let path = g.path(a, b).unwrap();
                assert_eq!(path.first(), Some(&a));
                assert_eq!(path.last(), Some(&b));
            }
        }
    }

    #[test]
    fn expected_shortest_paths() {
        let g = graph();
        assert_eq!(
            g.path(HeliographicCarrington, Helioprojective).unwrap(),
            &[HeliographicCarrington, HeliographicStonyhurst, Heliocentric, Helioprojective]
        );
        assert_eq!(
            g.path(Hcrs, GeocentricSolarEcliptic).unwrap(),
            &[
                Hcrs,
                Icrs,
                HeliocentricMeanEcliptic,
                HeliocentricEarthEcliptic,
                GeocentricSolarEcliptic
            ]
        );
        assert_eq!(g.path(Icrs, Icrs).unwrap(), &[Icrs]);
    }

    #[test]
    fn missing_edges_give_no_path() {
        let provider = Arc::new(KeplerianEphemeris::default());
        let g = TransformGraph::builder(provider)
            .register(Icrs, Hcrs, TransformStep::Affine(transforms::builtin::icrs_to_hcrs))
            .build()
            .unwrap();
        assert!(g.path(Icrs, Hcrs).is_ok());
        assert_eq!(
            g.path(Hcrs, Icrs).unwrap_err(),
            TransformError::NoPath { from: Hcrs, to: Icrs }
        );
    }

    #[test]
    fn build_rejects_bad_config() {
        let provider = Arc::new(KeplerianEphemeris::default());
        let err = TransformGraph::builder(provider)
            .config(TransformConfig {
                observer_rtol: -1.0,
                ..TransformConfig::default()
            })
            .build()
            .unwrap_err();
        assert!(matches!(err, TransformError::InvalidConfig(_)));
    }

    #[test]
    fn affine_inverse_undoes_forward() {
        let rz = helio_frames::axis_angle_matrix(0.3, helio_frames::Axis::Z);
        let parts = AffineParts {
            matrices: vec![rz],
            offsets: Some(vec![[1.0, 2.0, 3.0]]),
            offset_velocities: None,
        };
        let data = CoordData::cartesian(vec![[4.0, -5.0, 6.0]]).unwrap();
        let there = parts.apply(&data).unwrap();
        let back = parts.inverse().apply(&there).unwrap();
        for k in 0..3 {
            assert!((back.positions()[0][k] - data.positions()[0][k]).abs() < 1e-12);
        }
    }

    #[test]
    fn stats_count_edges_and_cache() {
        let g = graph();
        let t = helio_time::Epoch::from_utc(2013, 4, 1, 0, 0, 0.0);
        let hcrs = Frame::at(Hcrs, t).unwrap();
        let coord = Coordinate::from_cartesian(hcrs, [1.0e8, 2.0e7, 3.0e6]).unwrap();
        let hee = Frame::at(HeliocentricEarthEcliptic, t).unwrap();
        let (_, stats) = g.transform_with_stats(&coord, &hee).unwrap();
        assert!(stats.edges >= 3);
        assert!(stats.evaluations > 0);
        assert!(stats.cache_hits > 0, "repeated Sun lookups should hit the cache");
    }
}
