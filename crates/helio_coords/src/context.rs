//! Per-request ephemeris adapter.
//!
//! A [`TransformContext`] is created at the start of each top-level
//! transform, threaded through every edge that transform runs, and
//! dropped at the end. It memoizes Sun and Earth lookups keyed by the
//! epoch's bit pattern, so a multi-hop path queries each body once per
//! distinct instant.

use std::collections::HashMap;

use helio_ephem::{Body, StateVector};
use helio_frames::vector::sub;
use helio_frames::Vec3;
use helio_time::Epoch;

use crate::coordinate::Coordinate;
use crate::error::TransformError;
use crate::frame::{Frame, ObsTime};
use crate::graph::{TransformConfig, TransformGraph};

/// Telemetry from one transform call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QueryStats {
    /// Ephemeris evaluations that missed the cache.
    pub evaluations: u32,
    pub cache_hits: u32,
    /// Graph edges executed, including nested ones.
    pub edges: u32,
}

pub struct TransformContext<'g> {
    graph: &'g TransformGraph,
    positions: HashMap<(Body, u64), Vec3>,
    states: HashMap<(Body, u64), StateVector>,
    pub(crate) stats: QueryStats,
}

impl<'g> TransformContext<'g> {
    pub(crate) fn new(graph: &'g TransformGraph) -> Self {
        Self {
            graph,
            positions: HashMap::with_capacity(8),
            states: HashMap::new(),
            stats: QueryStats::default(),
        }
    }

    pub fn graph(&self) -> &'g TransformGraph {
        self.graph
    }

    pub fn config(&self) -> &'g TransformConfig {
        self.graph.config()
    }

    pub fn stats(&self) -> QueryStats {
        self.stats
    }

    /// Transform within this context (shares the ephemeris cache).
    pub fn transform(
        &mut self,
        coord: &Coordinate,
        to: &Frame,
    ) -> Result<Coordinate, TransformError> {
        let graph = self.graph;
        graph.transform_in(self, coord, to)
    }

    /// Barycentric ICRF position of `body` (km).
    pub fn body_position(&mut self, body: Body, epoch: Epoch) -> Result<Vec3, TransformError> {
        let key = (body, epoch.to_bits());
        if let Some(cached) = self.positions.get(&key) {
            self.stats.cache_hits += 1;
            return Ok(*cached);
        }
        let pos = self.graph.ephemeris().position(body, epoch)?;
        self.stats.evaluations += 1;
        self.positions.insert(key, pos);
        Ok(pos)
    }

    /// Barycentric ICRF state of `body` (km, km/s).
    pub fn body_state(&mut self, body: Body, epoch: Epoch) -> Result<StateVector, TransformError> {
        let key = (body, epoch.to_bits());
        if let Some(cached) = self.states.get(&key) {
            self.stats.cache_hits += 1;
            return Ok(*cached);
        }
        let state = self.graph.ephemeris().state(body, epoch)?;
        self.stats.evaluations += 1;
        self.states.insert(key, state);
        Ok(state)
    }

    /// Positions of `body` at every epoch of `obstime`.
    pub fn body_positions(
        &mut self,
        body: Body,
        obstime: &ObsTime,
    ) -> Result<Vec<Vec3>, TransformError> {
        obstime
            .epochs()
            .iter()
            .map(|&e| self.body_position(body, e))
            .collect()
    }

    /// Sun→Earth vector in ICRF axes (km).
    pub fn sun_earth_at(&mut self, epoch: Epoch) -> Result<Vec3, TransformError> {
        let earth = self.body_position(Body::Earth, epoch)?;
        let sun = self.body_position(Body::Sun, epoch)?;
        Ok(sub(&earth, &sun))
    }

    /// Sun→Earth vectors at every epoch of `obstime`.
    pub fn sun_earth(&mut self, obstime: &ObsTime) -> Result<Vec<Vec3>, TransformError> {
        obstime
            .epochs()
            .iter()
            .map(|&e| self.sun_earth_at(e))
            .collect()
    }

    /// Sun velocity minus Earth velocity in ICRF axes (km/s).
    pub fn sun_minus_earth_velocity(
        &mut self,
        obstime: &ObsTime,
    ) -> Result<Vec<Vec3>, TransformError> {
        obstime
            .epochs()
            .iter()
            .map(|&e| {
                let sun = self.body_state(Body::Sun, e)?;
                let earth = self.body_state(Body::Earth, e)?;
                Ok(sub(&sun.velocity_km_s, &earth.velocity_km_s))
            })
            .collect()
    }
}
