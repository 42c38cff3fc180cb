//! Metro network model with route planning and topology editing.
//!
//! The crate owns three concerns:
//!
//! - a graph substrate of [`Station`]s and [`Line`]s ([`model`]),
//!   constructed once from a network document ([`loading`]),
//! - two route planners over that graph ([`routing`]): a shortest-time
//!   Dijkstra search and an exhaustive least-transfers search, plus a
//!   per-path line-selection optimizer,
//! - a topology editor ([`editing`]) that inserts, removes and extends
//!   stations while keeping adjacency symmetric and line sequences
//!   consistent.
//!
//! [`MetroSystem`] ties these together behind a read/write lock and layers
//! fares and wait-time estimates on top of planner results. HTTP or CLI
//! surfaces are out of scope; this crate only emits `log` records and
//! returns plain data.
//!
//! [`Station`]: model::Station
//! [`Line`]: model::Line
//! [`MetroSystem`]: system::MetroSystem

pub mod editing;
pub mod error;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod routing;
pub mod system;

pub use error::Error;
pub use model::{Line, MetroNetwork, Station};
pub use system::MetroSystem;

/// Hard cap on least-transfers search depth (hops per path). Guards against
/// pathologically dense graphs; real metro networks stay far below it.
pub const MAX_SEARCH_DEPTH: usize = 256;
