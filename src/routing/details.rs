use itertools::Itertools;

use super::{RouteDetails, Segment, travel_minutes};
use crate::error::Error;
use crate::model::{MetroNetwork, Station};

/// Expands a planned `(path, lines)` pair into per-segment records and
/// totals.
///
/// Pure in its inputs for a fixed network: identical calls produce
/// identical records regardless of order or any facade state. Segment times
/// are riding time only; `total_time` additionally counts a stop minute on
/// every hop but the last and a transfer penalty wherever consecutive hops
/// change line.
///
/// # Errors
///
/// `InvalidData` when the line sequence length does not match the path or
/// a hop has no edge in the graph; `UnknownStation`/`UnknownLine` when the
/// inputs reference entities the network does not contain.
pub fn route_details(
    net: &MetroNetwork,
    path: &[String],
    lines: &[String],
) -> Result<RouteDetails, Error> {
    if lines.len() != path.len().saturating_sub(1) {
        return Err(Error::InvalidData(format!(
            "{} stations need {} line choices, got {}",
            path.len(),
            path.len().saturating_sub(1),
            lines.len()
        )));
    }
    if path.len() <= 1 {
        return Ok(RouteDetails::default());
    }

    let mut details = RouteDetails::default();
    for (i, ((from, to), line_id)) in path.iter().tuple_windows().zip(lines).enumerate() {
        net.station(from)?;
        net.station(to)?;
        let distance = net.edge_distance(from, to).ok_or_else(|| {
            Error::InvalidData(format!("no edge between {from} and {to}"))
        })?;
        let line = net.line(line_id)?;
        let time = travel_minutes(distance, line.speed_kmh);

        details.total_distance += distance;
        details.total_time += time;
        if i + 2 < path.len() {
            details.total_time += Station::STOP_TIME;
        }
        if i > 0 && lines[i - 1] != *line_id {
            details.total_time += Station::TRANSFER_TIME;
            details.transfers += 1;
        }
        details.segments.push(Segment {
            from: from.clone(),
            to: to.clone(),
            line: line_id.clone(),
            distance,
            time,
        });
    }
    Ok(details)
}
