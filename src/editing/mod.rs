//! Topology editor.
//!
//! The three mutations validate their whole precondition set before touching
//! the graph, so a failed call leaves the network exactly as it was. Each
//! successful mutation ends by reapplying the derived ring-closure edges;
//! callers hold the exclusive lock for the full call, so no query can
//! observe the intermediate states.

use itertools::Itertools;
use log::info;

use crate::error::Error;
use crate::model::{MetroNetwork, Station};

/// Inserts `new` between two stations that are adjacent on `line_id`,
/// splitting their direct edge into two.
///
/// # Errors
///
/// `UnknownLine` for an unknown line, `InvalidTopology` when `prev`/`next`
/// are not adjacent within the line's sequence or when `new` already
/// exists, `InvalidData` for non-positive distances.
pub fn add_station(
    net: &mut MetroNetwork,
    line_id: &str,
    prev: &str,
    next: &str,
    new: &str,
    prev_distance: f64,
    next_distance: f64,
) -> Result<(), Error> {
    if prev_distance <= 0.0 || next_distance <= 0.0 {
        return Err(Error::InvalidData(
            "edge distances must be positive".to_string(),
        ));
    }
    let line = net.line(line_id)?;
    let insert_idx = line.insertion_index(prev, next)?;
    if net.stations.contains_key(new) {
        return Err(Error::InvalidTopology(format!(
            "station {new} already exists"
        )));
    }
    net.station(prev)?;
    net.station(next)?;

    let mut station = Station::new(new);
    station.add_line(line_id);
    net.stations.insert(new.to_string(), station);

    if let Some(line) = net.lines.get_mut(line_id) {
        line.stations.insert(insert_idx, new.to_string());
    }
    net.remove_edge(prev, next);
    net.add_edge(prev, new, prev_distance);
    net.add_edge(new, next, next_distance);

    net.rebuild_derived();
    info!("inserted {new} between {prev} and {next} on line {line_id}");
    Ok(())
}

/// Appends or prepends `new` past the given terminus of `line_id` with a
/// single new edge.
///
/// # Errors
///
/// `UnknownLine` for an unknown line, `InvalidTopology` when `terminal` is
/// not the first or last station of the sequence or when `new` already
/// exists, `InvalidData` for a non-positive distance.
pub fn extend_line(
    net: &mut MetroNetwork,
    line_id: &str,
    terminal: &str,
    new: &str,
    distance: f64,
) -> Result<(), Error> {
    if distance <= 0.0 {
        return Err(Error::InvalidData(
            "edge distance must be positive".to_string(),
        ));
    }
    let line = net.line(line_id)?;
    if !line.is_terminus(terminal) {
        return Err(Error::InvalidTopology(format!(
            "{terminal} is not a terminus of line {line_id}"
        )));
    }
    if net.stations.contains_key(new) {
        return Err(Error::InvalidTopology(format!(
            "station {new} already exists"
        )));
    }
    net.station(terminal)?;
    let at_front = line.stations.first().is_some_and(|s| s == terminal);

    let mut station = Station::new(new);
    station.add_line(line_id);
    net.stations.insert(new.to_string(), station);

    if let Some(line) = net.lines.get_mut(line_id) {
        if at_front {
            line.stations.insert(0, new.to_string());
        } else {
            line.stations.push(new.to_string());
        }
    }
    net.add_edge(terminal, new, distance);

    net.rebuild_derived();
    info!("extended line {line_id} past {terminal} with {new}");
    Ok(())
}

/// Removes a degree-2 station, merging its two edges into one whose
/// distance is the sum of the removed pair, and strips the station from
/// every owning line's sequence.
///
/// # Errors
///
/// `UnknownStation` when the station does not exist, `InvalidTopology`
/// when its degree is not exactly 2.
pub fn remove_station(net: &mut MetroNetwork, name: &str) -> Result<(), Error> {
    let station = net.station(name)?;
    if station.degree() != 2 {
        return Err(Error::InvalidTopology(format!(
            "{name} has {} neighbours; only stations with exactly two can be removed",
            station.degree()
        )));
    }
    let neighbours: Vec<(String, f64)> = station
        .adjacent
        .iter()
        .map(|(n, d)| (n.clone(), *d))
        .sorted_by(|a, b| a.0.cmp(&b.0))
        .collect();
    let owning: Vec<String> = station.lines.iter().cloned().sorted().collect();

    let (prev, prev_distance) = neighbours[0].clone();
    let (next, next_distance) = neighbours[1].clone();
    let merged = prev_distance + next_distance;

    if let Some(p) = net.stations.get_mut(&prev) {
        p.replace_adjacent(name, next.as_str(), merged);
    }
    if let Some(n) = net.stations.get_mut(&next) {
        n.replace_adjacent(name, prev.as_str(), merged);
    }
    for line_id in owning {
        if let Some(line) = net.lines.get_mut(&line_id) {
            line.remove_station(name);
        }
    }
    net.stations.remove(name);

    net.rebuild_derived();
    info!("removed {name}; {prev} and {next} now joined at {merged} m");
    Ok(())
}
