pub use crate::MAX_SEARCH_DEPTH;

// Re-export key components
pub use crate::error::Error;
pub use crate::loading::{MetroModelConfig, create_metro_network, network_from_raw};
pub use crate::model::{Line, MetroNetwork, Station};
pub use crate::routing::{
    RouteAlternative, RouteDetails, Segment, TimedRoute, least_transfers_routes, route_details,
    shortest_time_route,
};
pub use crate::system::{MetroSystem, RouteSummary, fare_for_distance};
