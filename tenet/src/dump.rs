use crate::network::Network;
use std::fmt::{Display, Formatter};

/// Listing of the edges of a network, one block per node with at least one outgoing edge:
///
/// ```text
/// Node 1:
///    -> 6 (cap=100)
///    -> 25 (cap=1)
/// ```
///
/// Nodes are listed in increasing order and their edges in emission order. When labels are requested,
/// each node header is followed by the coordinates of the node, e.g. `Node 1: out(0@0)`.
pub struct Dump<'a> {
    network: &'a Network,
    labels: bool,
}

impl<'a> Dump<'a> {
    pub fn new(network: &'a Network) -> Self {
        Dump { network, labels: false }
    }

    pub fn with_labels(self, labels: bool) -> Self {
        Dump { labels, ..self }
    }
}

impl Display for Dump<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for node in self.network.sources() {
            write!(f, "Node {node}:")?;
            if self.labels {
                if let Ok(coordinates) = self.network.locate(node) {
                    write!(f, " {coordinates}")?;
                }
            }
            writeln!(f)?;
            for edge in self.network.edges_of(node) {
                writeln!(f, "   -> {} (cap={})", edge.to, edge.capacity)?;
            }
        }
        Ok(())
    }
}
