use crate::ids::{HubId, NodeId, RouteId, Step};
use derive_more::Display;
use thiserror::Error;

pub type Res<T> = Result<T, NetworkError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(#[from] CoordinateError),
    #[error("node {node} already has {max_out_degree} outgoing edges (maximum out-degree reached)")]
    CapacityExceeded { node: NodeId, max_out_degree: usize },
    #[error("the store holds {num_nodes} nodes but the network has {expected}")]
    StoreSizeMismatch { num_nodes: usize, expected: usize },
    #[error("the store already holds {num_edges} edges")]
    StoreNotEmpty { num_edges: usize },
}

/// Which end of a route refers to a hub.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum RouteEnd {
    #[display("origin")]
    Origin,
    #[display("destination")]
    Destination,
}

/// The place in the parameters where a hub is referenced.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum HubRef {
    #[display("{_1} of restricted route {_0}")]
    RestrictedRoute(usize, RouteEnd),
    #[display("{_1} of route {_0}")]
    Route(usize, RouteEnd),
    #[display("waitable hub")]
    Waitable,
    #[display("hub capacity override")]
    CapacityOverride,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{place} references hub {hub} but the network only has {num_hubs} hubs")]
    UnknownHub { place: HubRef, hub: HubId, num_hubs: usize },
    #[error("the network would have more than {} nodes", u32::MAX)]
    TooManyNodes,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoordinateError {
    #[error("hub {hub} is out of range (num hubs: {num_hubs})")]
    Hub { hub: HubId, num_hubs: u32 },
    #[error("step {step} is out of range (horizon: {horizon})")]
    Step { step: Step, horizon: Step },
    #[error("restricted route {route} is out of range (num restricted routes: {num_routes})")]
    Route { route: RouteId, num_routes: u32 },
    #[error("node {node} is out of range (total nodes: {total_nodes})")]
    Node { node: NodeId, total_nodes: u32 },
}
