//! Data model for the metro network
//!
//! Contains the station/line entities and the network structure that ties
//! them together with symmetric adjacency.

pub mod line;
pub mod network;
pub mod station;

pub use line::Line;
pub use network::{InterchangeLeg, MetroNetwork, edge_key};
pub use station::Station;
