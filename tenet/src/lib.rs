//! Time-expanded capacitated flow networks.
//!
//! A set of hubs is unrolled over the discrete steps `0..=T`. Each hub exists once per step as an
//! arrival node and a departure node, and each restricted route has one transit node per step.
//! Edges represent occupying a hub, waiting at a hub and moving between hubs.
//!
//! ```
//! use tenet::{Parameters, build_network};
//!
//! let network = build_network(&Parameters::demo()).unwrap();
//! assert_eq!(network.total_nodes(), 28);
//! assert_eq!(network.num_edges(), 25);
//! ```

mod assembler;
mod dump;
pub mod errors;
mod ids;
mod indexer;
mod network;
mod params;
mod store;

pub use assembler::*;
pub use dump::*;
pub use errors::{ConfigError, CoordinateError, NetworkError, Res};
pub use ids::*;
pub use indexer::*;
pub use network::*;
pub use params::*;
pub use store::*;
