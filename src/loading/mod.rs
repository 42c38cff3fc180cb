//! Loading a metro network from its JSON description.
//!
//! The raw document carries per-line speeds, chained station-distance
//! segments, optional departure tables, and the two override tables
//! (ring closures and direct-interchange pairs) as plain data.

mod builder;
mod raw_types;

pub use builder::{MetroModelConfig, create_metro_network, network_from_raw};
pub use raw_types::{RawInterchange, RawLine, RawNetwork, RawSegment};
