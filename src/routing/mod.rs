//! Route planning over the metro network.
//!
//! Two independent planners share the same per-hop cost model:
//! [`shortest_time_route`] (priority-queue search with a transfer penalty)
//! and [`least_transfers_routes`] (bounded exhaustive search returning every
//! minimum-transfer path). [`route_details`] turns a planned path into
//! per-segment records.

mod details;
mod least_transfers;
pub(crate) mod line_choice;
mod shortest_time;

use serde::Serialize;

pub use details::route_details;
pub use least_transfers::least_transfers_routes;
pub use shortest_time::shortest_time_route;

/// Minutes spent riding `distance_m` meters at `speed_kmh`.
pub(crate) fn travel_minutes(distance_m: f64, speed_kmh: f64) -> f64 {
    (distance_m / 1000.0) / (speed_kmh / 60.0)
}

/// A shortest-time answer: the station path, the per-hop line assignment
/// and the total time in minutes.
#[derive(Debug, Clone, Serialize)]
pub struct TimedRoute {
    pub path: Vec<String>,
    pub lines: Vec<String>,
    pub total_time: f64,
}

/// One minimum-transfer alternative, with the line choices fixed during the
/// search that found it.
#[derive(Debug, Clone, Serialize)]
pub struct RouteAlternative {
    pub path: Vec<String>,
    pub lines: Vec<String>,
    pub transfers: usize,
    pub total_time: f64,
}

/// One hop of a planned route. `time` is riding time only; stop and
/// transfer minutes are accounted for in [`RouteDetails::total_time`].
#[derive(Debug, Clone, Serialize)]
pub struct Segment {
    pub from: String,
    pub to: String,
    pub line: String,
    pub distance: f64,
    pub time: f64,
}

/// Aggregated per-path record produced by [`route_details`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct RouteDetails {
    pub segments: Vec<Segment>,
    pub total_distance: f64,
    pub total_time: f64,
    pub transfers: usize,
}
