//! Front end turning drone maps into time-expanded networks.
//!
//! A [`Map`] is parsed from text, reduced to its traversable [`BaseGraph`] and lowered into an [`Instance`]
//! whose parameters describe the network to build with [`tenet`].

pub mod base;
pub mod lower;
pub mod map;

pub use base::{BaseGraph, BaseGraphError};
pub use lower::Instance;
pub use map::{Map, MapError};
