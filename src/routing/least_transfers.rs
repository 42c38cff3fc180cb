use hashbrown::HashSet;
use itertools::Itertools;

use super::{RouteAlternative, travel_minutes};
use crate::MAX_SEARCH_DEPTH;
use crate::error::Error;
use crate::model::{MetroNetwork, Station, edge_key};

/// Exhaustive search for every path achieving the minimum number of line
/// changes, sorted by ascending total time.
///
/// Branch-and-bound DFS. Each branch owns its path, its per-hop line
/// choices, and its visited-station/visited-edge sets (cloned on branch, so
/// sibling branches never alias). A branch is cut once its transfer count
/// exceeds the best found so far; reaching the destination with a strictly
/// better count discards everything collected before. Path times are
/// replayed afterwards from each branch's own recorded line choices, never
/// re-optimized.
///
/// Pairs listed in the network's direct-interchange table skip the search:
/// the answer is the table's single-hop boarding options sorted by riding
/// time.
///
/// Returns `Ok(None)` when no path connects the endpoints.
///
/// # Errors
///
/// `UnknownStation` when either endpoint is absent from the network.
pub fn least_transfers_routes(
    net: &MetroNetwork,
    start: &str,
    end: &str,
) -> Result<Option<Vec<RouteAlternative>>, Error> {
    net.station(start)?;
    net.station(end)?;

    if start == end {
        return Ok(Some(vec![RouteAlternative {
            path: vec![start.to_string()],
            lines: Vec::new(),
            transfers: 0,
            total_time: 0.0,
        }]));
    }

    if let Some(alternatives) = direct_interchange_routes(net, start, end) {
        return Ok(Some(alternatives));
    }

    let mut search = Search {
        net,
        end,
        best: usize::MAX,
        found: Vec::new(),
    };
    let mut visited_stations = HashSet::new();
    visited_stations.insert(start.to_string());
    search.explore(
        start,
        &[start.to_string()],
        &[],
        0,
        &visited_stations,
        &HashSet::new(),
    );

    if search.found.is_empty() {
        return Ok(None);
    }

    let mut alternatives: Vec<RouteAlternative> = search
        .found
        .into_iter()
        .map(|(path, lines)| {
            let transfers = lines.windows(2).filter(|w| w[0] != w[1]).count();
            let total_time = replay_time(net, &path, &lines);
            RouteAlternative {
                path,
                lines,
                transfers,
                total_time,
            }
        })
        .collect();
    alternatives.sort_by(|a, b| a.total_time.total_cmp(&b.total_time));
    Ok(Some(alternatives))
}

/// Table-driven bypass for direct two-line interchange pairs. Falls back to
/// the general search when the pair is not listed or the edge is missing
/// from the graph (e.g. removed by an edit since the table was loaded).
fn direct_interchange_routes(
    net: &MetroNetwork,
    start: &str,
    end: &str,
) -> Option<Vec<RouteAlternative>> {
    let legs = net.direct_interchange(start, end)?;
    let distance = net.edge_distance(start, end)?;
    if legs.is_empty() {
        return None;
    }
    let mut alternatives: Vec<RouteAlternative> = legs
        .iter()
        .map(|leg| RouteAlternative {
            path: vec![start.to_string(), end.to_string()],
            lines: vec![leg.line.clone()],
            transfers: 0,
            total_time: travel_minutes(distance, leg.speed_kmh),
        })
        .collect();
    alternatives.sort_by(|a, b| a.total_time.total_cmp(&b.total_time));
    Some(alternatives)
}

struct Search<'a> {
    net: &'a MetroNetwork,
    end: &'a str,
    best: usize,
    /// `(station path, per-hop line choices)` for every path at the current
    /// best transfer count.
    found: Vec<(Vec<String>, Vec<String>)>,
}

impl Search<'_> {
    #[allow(clippy::too_many_arguments)]
    fn explore(
        &mut self,
        station: &str,
        path: &[String],
        lines: &[String],
        transfers: usize,
        visited_stations: &HashSet<String>,
        visited_edges: &HashSet<(String, String)>,
    ) {
        if transfers > self.best {
            return;
        }
        if station == self.end {
            if transfers < self.best {
                self.best = transfers;
                self.found.clear();
            }
            self.found.push((path.to_vec(), lines.to_vec()));
            return;
        }
        if path.len() >= MAX_SEARCH_DEPTH {
            return;
        }
        let Ok(current) = self.net.station(station) else {
            return;
        };

        for (next, _) in current.adjacent.iter().sorted_by(|a, b| a.0.cmp(b.0)) {
            if visited_stations.contains(next) {
                continue;
            }
            let edge = edge_key(station, next);
            if visited_edges.contains(&edge) {
                continue;
            }
            let candidates = self.net.lines_between(station, next);
            if candidates.is_empty() {
                continue;
            }

            let mut next_stations = visited_stations.clone();
            next_stations.insert(next.clone());
            let mut next_edges = visited_edges.clone();
            next_edges.insert(edge);
            let mut next_path = path.to_vec();
            next_path.push(next.clone());

            for candidate in candidates {
                let hop_transfers = transfers
                    + usize::from(lines.last().is_some_and(|ridden| *ridden != candidate));
                if hop_transfers > self.best {
                    continue;
                }
                let mut next_lines = lines.to_vec();
                next_lines.push(candidate);
                self.explore(
                    next,
                    &next_path,
                    &next_lines,
                    hop_transfers,
                    &next_stations,
                    &next_edges,
                );
            }
        }
    }
}

/// Total minutes for a finished path, replaying its own recorded line
/// choices: riding time per hop, a stop minute on every hop but the last,
/// and a transfer penalty wherever consecutive hops change line.
fn replay_time(net: &MetroNetwork, path: &[String], lines: &[String]) -> f64 {
    let mut total = 0.0;
    for (i, ((from, to), line_id)) in path.iter().tuple_windows().zip(lines).enumerate() {
        // The search only records hops over existing edges and lines.
        let distance = net.edge_distance(from, to);
        debug_assert!(distance.is_some(), "replayed hop {from} -> {to} has no edge");
        let speed = net.line(line_id).map(|l| l.speed_kmh);
        debug_assert!(speed.is_ok(), "replayed hop {from} -> {to} rides unknown line {line_id}");
        total += travel_minutes(distance.unwrap_or(0.0), speed.unwrap_or(1.0));
        if i + 1 < lines.len() {
            total += Station::STOP_TIME;
        }
        if i > 0 && lines[i - 1] != *line_id {
            total += Station::TRANSFER_TIME;
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::loading::{RawLine, RawNetwork, RawSegment, network_from_raw};

    fn segment(from: &str, to: &str) -> RawSegment {
        RawSegment {
            from: from.into(),
            to: to.into(),
            distance_m: 1000.0,
        }
    }

    #[test]
    fn replay_charges_stops_and_transfers_from_recorded_choices() {
        let mut raw = RawNetwork::default();
        raw.lines.insert(
            "L1".into(),
            RawLine {
                speed_kmh: 30.0,
                segments: vec![segment("A", "B"), segment("B", "C")],
                departures: HashMap::new(),
            },
        );
        raw.lines.insert(
            "L2".into(),
            RawLine {
                speed_kmh: 60.0,
                segments: vec![segment("B", "C")],
                departures: HashMap::new(),
            },
        );
        let net = network_from_raw(raw).expect("fixture is well-formed");

        let path: Vec<String> = ["A", "B", "C"].map(String::from).to_vec();
        let lines: Vec<String> = ["L1", "L2"].map(String::from).to_vec();
        // 2 min on L1 + stop + 5 min transfer at B + 1 min on L2.
        assert!((replay_time(&net, &path, &lines) - 9.0).abs() < 1e-9);
    }
}
