//! Layout of the node identifiers of a time-expanded network.
//!
//! Each `(hub, step)` pair is split into an *arrival* and a *departure* node, stored next to each other:
//! the pair with hub-time index `i = step * H + hub` owns the ids `2i` (arrival) and `2i + 1` (departure).
//! The transit slots of the restricted routes come after all hub nodes, one per `(route, step)` pair:
//! `2H(T+1) + step * R + route`.
//!
//! ```text
//!  0      1       2      3            2H(T+1)-1   2H(T+1)           2H(T+1) + R(T+1) - 1
//! [in(0@0) out(0@0) in(1@0) out(1@0) ... out(H-1@T) transit(0@0) ... transit(R-1@T)]
//! ```

use crate::errors::{ConfigError, CoordinateError};
use crate::ids::{HubId, NodeId, RouteId, Step};
use derive_more::Display;

/// Semantic coordinates of a node.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash)]
pub enum Node {
    /// Entry half of a hub at a given step.
    #[display("in({hub}@{step})")]
    Arrival { hub: HubId, step: Step },
    /// Exit half of a hub at a given step.
    #[display("out({hub}@{step})")]
    Departure { hub: HubId, step: Step },
    /// Slot in which a movement on a restricted route spends the given step.
    #[display("transit({route}@{step})")]
    Transit { route: RouteId, step: Step },
}

/// Pure mapping between semantic coordinates and node identifiers.
///
/// All functions validate their inputs and fail with a [`CoordinateError`] rather than computing an id
/// that belongs to another coordinate.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct NodeIndexer {
    num_hubs: u32,
    horizon: Step,
    num_routes: u32,
}

impl NodeIndexer {
    /// Creates the indexer of a network with `num_hubs` hubs, steps in `0..=horizon` and `num_routes`
    /// restricted routes.
    ///
    /// Fails if the total number of nodes does not fit in a [`NodeId`].
    pub fn new(num_hubs: usize, horizon: Step, num_routes: usize) -> Result<NodeIndexer, ConfigError> {
        let steps = u64::from(horizon) + 1;
        let total = (num_hubs as u64)
            .checked_mul(2)
            .and_then(|hub_nodes| hub_nodes.checked_add(num_routes as u64))
            .and_then(|per_step| per_step.checked_mul(steps))
            .ok_or(ConfigError::TooManyNodes)?;
        if total > u64::from(u32::MAX) || steps > u64::from(u32::MAX) {
            return Err(ConfigError::TooManyNodes);
        }
        Ok(NodeIndexer {
            num_hubs: num_hubs as u32,
            horizon,
            num_routes: num_routes as u32,
        })
    }

    pub fn num_hubs(&self) -> u32 {
        self.num_hubs
    }

    pub fn horizon(&self) -> Step {
        self.horizon
    }

    pub fn num_routes(&self) -> u32 {
        self.num_routes
    }

    /// Number of time steps, i.e. `T + 1`.
    pub fn num_steps(&self) -> u32 {
        self.horizon + 1
    }

    /// First id of the transit family: `2H(T+1)`.
    fn transit_offset(&self) -> u32 {
        2 * self.num_hubs * self.num_steps()
    }

    /// Total number of nodes: `2H(T+1) + R(T+1)`.
    pub fn total_nodes(&self) -> u32 {
        self.transit_offset() + self.num_routes * self.num_steps()
    }

    pub fn hubs(&self) -> impl Iterator<Item = HubId> + Clone + use<> {
        (0..self.num_hubs).map(HubId::from)
    }

    pub fn steps(&self) -> impl Iterator<Item = Step> + Clone + use<> {
        0..=self.horizon
    }

    fn check_hub(&self, hub: HubId) -> Result<u32, CoordinateError> {
        if hub.to_u32() < self.num_hubs {
            Ok(hub.to_u32())
        } else {
            Err(CoordinateError::Hub {
                hub,
                num_hubs: self.num_hubs,
            })
        }
    }

    fn check_step(&self, step: Step) -> Result<u32, CoordinateError> {
        if step <= self.horizon {
            Ok(step)
        } else {
            Err(CoordinateError::Step {
                step,
                horizon: self.horizon,
            })
        }
    }

    fn check_route(&self, route: RouteId) -> Result<u32, CoordinateError> {
        if route.to_u32() < self.num_routes {
            Ok(route.to_u32())
        } else {
            Err(CoordinateError::Route {
                route,
                num_routes: self.num_routes,
            })
        }
    }

    /// Dense index of a `(hub, step)` pair: `step * H + hub`.
    pub fn hub_time_index(&self, hub: HubId, step: Step) -> Result<u32, CoordinateError> {
        let hub = self.check_hub(hub)?;
        let step = self.check_step(step)?;
        Ok(step * self.num_hubs + hub)
    }

    /// Node through which every movement entering `hub` at `step` goes.
    pub fn arrival_id(&self, hub: HubId, step: Step) -> Result<NodeId, CoordinateError> {
        Ok(NodeId::from(2 * self.hub_time_index(hub, step)?))
    }

    /// Node from which every movement leaving `hub` at `step` starts.
    pub fn departure_id(&self, hub: HubId, step: Step) -> Result<NodeId, CoordinateError> {
        Ok(NodeId::from(2 * self.hub_time_index(hub, step)? + 1))
    }

    /// Transit slot of restricted route `route` at `step`.
    pub fn transit_id(&self, route: RouteId, step: Step) -> Result<NodeId, CoordinateError> {
        let route = self.check_route(route)?;
        let step = self.check_step(step)?;
        Ok(NodeId::from(self.transit_offset() + step * self.num_routes + route))
    }

    pub fn contains(&self, node: NodeId) -> bool {
        node.to_u32() < self.total_nodes()
    }

    /// Inverse of the id functions: returns the coordinates of `node`.
    pub fn locate(&self, node: NodeId) -> Result<Node, CoordinateError> {
        let id = node.to_u32();
        if !self.contains(node) {
            return Err(CoordinateError::Node {
                node,
                total_nodes: self.total_nodes(),
            });
        }
        let offset = self.transit_offset();
        if id < offset {
            let hub_time = id / 2;
            let hub = HubId::from(hub_time % self.num_hubs);
            let step = hub_time / self.num_hubs;
            if id % 2 == 0 {
                Ok(Node::Arrival { hub, step })
            } else {
                Ok(Node::Departure { hub, step })
            }
        } else {
            let slot = id - offset;
            Ok(Node::Transit {
                route: RouteId::from(slot % self.num_routes),
                step: slot / self.num_routes,
            })
        }
    }
}
