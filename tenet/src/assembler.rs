//! Emission of the edges of a time-expanded network.
//!
//! Edges are emitted in four passes, always in the same order since the order of the edges in an
//! adjacency list is the order in which a downstream solver will consider them:
//!
//! 1. capacity split: `in(h@t) -> out(h@t)` for every step `t` then every hub `h`;
//! 2. waiting: `out(h@t) -> in(h@t+1)` for every step `t < T` then every waitable hub (ascending);
//! 3. restricted routes: for every restricted route `r = (o, d)` then every step `t <= T-2`,
//!    `out(o@t) -> transit(r@t+1)` followed by `transit(r@t+1) -> in(d@t+2)`;
//! 4. direct routes: `out(o@t) -> in(d@t+1)` for every step `t < T` then every route `(o, d)`.
//!
//! Splitting a hub into two nodes turns its occupancy bound into the capacity of a single edge.
//! The transit slot of a restricted route is only reachable from `t` and only leads to `t+2`,
//! which makes any traversal of the route last exactly two steps.

use crate::errors::{ConfigError, NetworkError, Res};
use crate::ids::RouteId;
use crate::indexer::NodeIndexer;
use crate::params::Parameters;
use crate::store::AdjacencyStore;
use derive_more::Display;
use itertools::iproduct;

/// Number of edges of each kind in a network.
#[derive(Copy, Clone, Debug, Default, Display, PartialEq, Eq)]
#[display("split: {split}, wait: {wait}, transit: {transit}, direct: {direct}")]
pub struct EdgeCounts {
    /// Arrival -> departure edges.
    pub split: usize,
    pub wait: usize,
    /// Both hops of the restricted routes.
    pub transit: usize,
    /// Single-step edges of the unrestricted routes.
    pub direct: usize,
}

impl EdgeCounts {
    pub fn total(&self) -> usize {
        self.split + self.wait + self.transit + self.direct
    }
}

/// Emits the edges of the network described by a validated set of [`Parameters`].
pub struct Assembler<'a> {
    params: &'a Parameters,
    indexer: NodeIndexer,
}

impl<'a> Assembler<'a> {
    /// Validates the parameters. No edge can be emitted from invalid parameters.
    pub fn new(params: &'a Parameters) -> Result<Self, ConfigError> {
        params.validate()?;
        let indexer = NodeIndexer::new(params.num_hubs, params.horizon, params.num_restricted_routes())?;
        Ok(Assembler { params, indexer })
    }

    pub fn indexer(&self) -> NodeIndexer {
        self.indexer
    }

    /// Appends all edges of the network to `store`.
    ///
    /// The store must be empty and sized for the network, otherwise nothing is emitted.
    pub fn assemble(&self, store: &mut AdjacencyStore) -> Res<EdgeCounts> {
        let expected = self.indexer.total_nodes() as usize;
        if store.num_nodes() != expected {
            return Err(NetworkError::StoreSizeMismatch {
                num_nodes: store.num_nodes(),
                expected,
            });
        }
        if store.num_edges() != 0 {
            return Err(NetworkError::StoreNotEmpty {
                num_edges: store.num_edges(),
            });
        }
        let counts = EdgeCounts {
            split: self.split_edges(store)?,
            wait: self.wait_edges(store)?,
            transit: self.transit_edges(store)?,
            direct: self.direct_edges(store)?,
        };
        tracing::debug!(%counts);
        Ok(counts)
    }

    fn split_edges(&self, store: &mut AdjacencyStore) -> Res<usize> {
        let idx = &self.indexer;
        let mut count = 0;
        for (t, hub) in iproduct!(idx.steps(), idx.hubs()) {
            store.add_edge(
                idx.arrival_id(hub, t)?,
                idx.departure_id(hub, t)?,
                self.params.hub_capacity(hub),
            )?;
            count += 1;
        }
        Ok(count)
    }

    fn wait_edges(&self, store: &mut AdjacencyStore) -> Res<usize> {
        let idx = &self.indexer;
        let capacity = self.params.capacities.wait;
        let mut count = 0;
        for (t, &hub) in iproduct!(0..idx.horizon(), &self.params.waitable_hubs) {
            store.add_edge(idx.departure_id(hub, t)?, idx.arrival_id(hub, t + 1)?, capacity)?;
            count += 1;
        }
        Ok(count)
    }

    fn transit_edges(&self, store: &mut AdjacencyStore) -> Res<usize> {
        let idx = &self.indexer;
        // a restricted route needs three steps (t, t+1, t+2) to be traversed at least once
        let Some(last_departure) = idx.horizon().checked_sub(2) else {
            return Ok(0);
        };
        let mut count = 0;
        for (i, route) in self.params.restricted_routes.iter().enumerate() {
            let route_id = RouteId::from(i);
            let entry_capacity = self.params.route_capacity(route);
            tracing::trace!(%route_id, origin = %route.origin, destination = %route.destination, "restricted route");
            for t in 0..=last_departure {
                let slot = idx.transit_id(route_id, t + 1)?;
                store.add_edge(idx.departure_id(route.origin, t)?, slot, entry_capacity)?;
                store.add_edge(slot, idx.arrival_id(route.destination, t + 2)?, self.params.capacities.transit)?;
                count += 2;
            }
        }
        Ok(count)
    }

    fn direct_edges(&self, store: &mut AdjacencyStore) -> Res<usize> {
        let idx = &self.indexer;
        let mut count = 0;
        for (t, route) in iproduct!(0..idx.horizon(), &self.params.routes) {
            store.add_edge(
                idx.departure_id(route.origin, t)?,
                idx.arrival_id(route.destination, t + 1)?,
                self.params.route_capacity(route),
            )?;
            count += 1;
        }
        Ok(count)
    }
}
