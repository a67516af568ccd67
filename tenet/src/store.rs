use crate::errors::{CoordinateError, NetworkError, Res};
use crate::ids::{IdVec, NodeId};

pub type Capacity = u32;

/// Outgoing edge of a node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Edge {
    pub to: NodeId,
    pub capacity: Capacity,
}

impl Edge {
    pub fn new(to: NodeId, capacity: Capacity) -> Self {
        Edge { to, capacity }
    }
}

/// Restartable iterator over the outgoing edges of a node, in insertion order.
pub type Edges<'a> = std::iter::Copied<std::slice::Iter<'a, Edge>>;

/// Outgoing edge lists of a fixed set of nodes.
///
/// Edges are only ever appended: their relative order for a given source is the order of insertion.
/// Parallel edges are kept as distinct entries.
#[derive(Clone, Debug)]
pub struct AdjacencyStore {
    adjacency: IdVec<NodeId, Vec<Edge>>,
    max_out_degree: usize,
    num_edges: usize,
}

impl AdjacencyStore {
    /// Creates a store for nodes `0..num_nodes` where no node may have more than `max_out_degree`
    /// outgoing edges.
    pub fn new(num_nodes: usize, max_out_degree: usize) -> Self {
        AdjacencyStore {
            adjacency: IdVec::with_values(num_nodes, Vec::new()),
            max_out_degree,
            num_edges: 0,
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.adjacency.len()
    }

    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    pub fn max_out_degree(&self) -> usize {
        self.max_out_degree
    }

    fn check_node(&self, node: NodeId) -> Result<(), CoordinateError> {
        if self.adjacency.contains(node) {
            Ok(())
        } else {
            Err(CoordinateError::Node {
                node,
                total_nodes: self.adjacency.len() as u32,
            })
        }
    }

    /// Appends the edge `from -> to` to the outgoing edges of `from`.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, capacity: Capacity) -> Res<()> {
        self.check_node(from)?;
        self.check_node(to)?;
        let edges = &mut self.adjacency[from];
        if edges.len() >= self.max_out_degree {
            return Err(NetworkError::CapacityExceeded {
                node: from,
                max_out_degree: self.max_out_degree,
            });
        }
        edges.push(Edge::new(to, capacity));
        self.num_edges += 1;
        Ok(())
    }

    /// Outgoing edges of `node` in insertion order. Unknown nodes have no edges.
    pub fn edges_of(&self, node: NodeId) -> Edges<'_> {
        self.adjacency.get(node).map_or(&[][..], |edges| edges.as_slice()).iter().copied()
    }

    pub fn out_degree(&self, node: NodeId) -> usize {
        self.adjacency.get(node).map_or(0, |edges| edges.len())
    }

    /// Nodes with at least one outgoing edge, in increasing order.
    pub fn sources(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.adjacency
            .entries()
            .filter(|(_, edges)| !edges.is_empty())
            .map(|(node, _)| node)
    }
}
