use crate::assembler::{Assembler, EdgeCounts};
use crate::dump::Dump;
use crate::errors::{CoordinateError, Res};
use crate::ids::NodeId;
use crate::indexer::{Node, NodeIndexer};
use crate::params::Parameters;
use crate::store::{AdjacencyStore, Edge, Edges};

/// A fully built time-expanded network.
///
/// The network is immutable: it can be shared between threads and read concurrently.
#[derive(Clone, Debug)]
pub struct Network {
    indexer: NodeIndexer,
    store: AdjacencyStore,
    counts: EdgeCounts,
}

/// Builds the network described by `params`.
///
/// The parameters are validated before anything is allocated: an invalid configuration never results in
/// a partially built network.
pub fn build_network(params: &Parameters) -> Res<Network> {
    let _span = tracing::span!(tracing::Level::DEBUG, "BUILD").entered();
    let assembler = Assembler::new(params)?;
    let indexer = assembler.indexer();
    tracing::debug!(
        num_hubs = params.num_hubs,
        horizon = params.horizon,
        num_restricted = params.num_restricted_routes(),
        total_nodes = indexer.total_nodes(),
    );
    let mut store = AdjacencyStore::new(indexer.total_nodes() as usize, params.max_out_degree);
    let counts = assembler.assemble(&mut store)?;
    tracing::debug!(num_edges = store.num_edges(), "Done.");
    Ok(Network { indexer, store, counts })
}

impl Network {
    pub fn total_nodes(&self) -> usize {
        self.store.num_nodes()
    }

    pub fn num_edges(&self) -> usize {
        self.store.num_edges()
    }

    pub fn edge_counts(&self) -> EdgeCounts {
        self.counts
    }

    pub fn indexer(&self) -> &NodeIndexer {
        &self.indexer
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.indexer.contains(node)
    }

    /// Coordinates of `node`.
    pub fn locate(&self, node: NodeId) -> Result<Node, CoordinateError> {
        self.indexer.locate(node)
    }

    /// Outgoing edges of `node`, in emission order. Nodes outside the network have no edges.
    pub fn edges_of(&self, node: NodeId) -> Edges<'_> {
        self.store.edges_of(node)
    }

    pub fn out_degree(&self, node: NodeId) -> usize {
        self.store.out_degree(node)
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + use<> {
        (0..self.indexer.total_nodes()).map(NodeId::from)
    }

    /// Nodes with at least one outgoing edge, in increasing order.
    pub fn sources(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.store.sources()
    }

    /// All edges, grouped by source node in increasing order.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, Edge)> + '_ {
        self.sources()
            .flat_map(move |from| self.edges_of(from).map(move |edge| (from, edge)))
    }

    /// Textual listing of the network, see [`Dump`].
    pub fn dump(&self) -> Dump<'_> {
        Dump::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ConfigError, NetworkError};
    use crate::ids::HubId;
    use crate::params::Route;
    use itertools::Itertools;

    #[test]
    fn demo_network() {
        let network = build_network(&Parameters::demo()).unwrap();
        assert_eq!(network.total_nodes(), 2 * 3 * 4 + 4);
        assert_eq!(network.num_edges(), 25);
        assert_eq!(network.edge_counts().total(), 25);
        assert_eq!(network.edges().count(), 25);
        assert_eq!(network.nodes().count(), 28);
        let degree_sum: usize = network.nodes().map(|n| network.out_degree(n)).sum();
        assert_eq!(degree_sum, 25);
    }

    #[test]
    fn edges_of_is_stable() {
        let network = build_network(&Parameters::demo()).unwrap();
        for node in network.nodes() {
            let first = network.edges_of(node).collect_vec();
            let second = network.edges_of(node).collect_vec();
            assert_eq!(first, second);
        }
        assert_eq!(network.edges_of(NodeId::from(1000u32)).count(), 0);
    }

    #[test]
    fn every_edge_goes_forward_in_time() {
        let params = Parameters::demo().with_route(Route::new(2u32, 0u32));
        let network = build_network(&params).unwrap();
        let step = |n: NodeId| match network.locate(n).unwrap() {
            Node::Arrival { step, .. } | Node::Departure { step, .. } | Node::Transit { step, .. } => step,
        };
        for (from, edge) in network.edges() {
            match (network.locate(from).unwrap(), network.locate(edge.to).unwrap()) {
                (Node::Arrival { hub: a, .. }, Node::Departure { hub: b, .. }) => {
                    assert_eq!(a, b);
                    assert_eq!(step(from), step(edge.to));
                }
                _ => assert_eq!(step(from) + 1, step(edge.to)),
            }
        }
    }

    #[test]
    fn node_count_matches_formula() {
        for (h, t, r) in itertools::iproduct!(1..4usize, 0..5u32, 0..3usize) {
            let mut params = Parameters::new(h, t);
            for i in 0..r {
                params = params.with_restricted_route(Route::new(0u32, (i % h) as u32));
            }
            let network = build_network(&params).unwrap();
            assert_eq!(network.total_nodes(), 2 * h * (t as usize + 1) + r * (t as usize + 1));
        }
    }

    #[test]
    fn unknown_hub_is_rejected() {
        let params = Parameters::demo().with_restricted_route(Route::new(HubId::from(3u32), HubId::from(0u32)));
        assert!(matches!(
            build_network(&params),
            Err(NetworkError::InvalidConfiguration(ConfigError::UnknownHub { .. }))
        ));
    }

    #[test]
    fn out_degree_bound_is_enforced() {
        // out(0@0) needs two edges in the demo network
        let params = Parameters::demo().with_max_out_degree(1);
        assert_eq!(
            build_network(&params).unwrap_err(),
            NetworkError::CapacityExceeded {
                node: NodeId::from(1u32),
                max_out_degree: 1
            }
        );
        assert!(build_network(&Parameters::demo().with_max_out_degree(2)).is_ok());
    }

    #[test]
    fn independent_builds_in_parallel() {
        let params: Vec<Parameters> = (0..4u32).map(|t| Parameters::demo().with_horizon(t)).collect();
        let networks: Vec<Network> = std::thread::scope(|s| {
            let handles = params
                .iter()
                .map(|p| s.spawn(move || build_network(p).unwrap()))
                .collect_vec();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        for (p, n) in params.iter().zip(&networks) {
            assert_eq!(n.edge_counts(), build_network(p).unwrap().edge_counts());
        }
        assert_eq!(networks[3].num_edges(), 25);
    }
}
