use std::{cmp::Ordering, collections::BinaryHeap};

use hashbrown::{HashMap, HashSet};
use itertools::Itertools;

use super::{TimedRoute, line_choice::optimize_line_choice, travel_minutes};
use crate::error::Error;
use crate::model::{MetroNetwork, Station};

#[derive(Clone, PartialEq)]
struct State {
    time: f64,
    line: Option<String>,
    station: String,
}

impl Eq for State {}

// Min-heap by cumulative time (reversed from standard Rust BinaryHeap);
// line and station break ties so equal-cost entries pop in a fixed order.
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .time
            .total_cmp(&self.time)
            .then_with(|| other.line.cmp(&self.line))
            .then_with(|| other.station.cmp(&self.station))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Dijkstra search minimizing total minutes.
///
/// Per-hop cost: riding time at the chosen line's speed, plus one stop
/// minute unless the hop ends at the requested destination, plus five
/// transfer minutes when the chosen line differs from the line of the
/// previous hop. Every line serving a hop is evaluated; the incumbent line
/// is tried first so it wins cost ties. Stations are finalized the first
/// time they are popped, which is sound because no cost is negative.
///
/// Returns `Ok(None)` when the queue drains before the destination is
/// reached. The reported line sequence is the transfer-minimal assignment
/// over the found station path (see `line_choice`), not the lines the
/// search happened to ride.
///
/// # Errors
///
/// `UnknownStation` when either endpoint is absent from the network.
pub fn shortest_time_route(
    net: &MetroNetwork,
    start: &str,
    end: &str,
) -> Result<Option<TimedRoute>, Error> {
    net.station(start)?;
    net.station(end)?;

    if start == end {
        return Ok(Some(TimedRoute {
            path: vec![start.to_string()],
            lines: Vec::new(),
            total_time: 0.0,
        }));
    }

    let mut best_time: HashMap<String, f64> = HashMap::new();
    let mut previous: HashMap<String, String> = HashMap::new();
    let mut finalized: HashSet<String> = HashSet::new();
    let mut heap = BinaryHeap::new();

    best_time.insert(start.to_string(), 0.0);
    heap.push(State {
        time: 0.0,
        line: None,
        station: start.to_string(),
    });

    while let Some(State {
        time,
        line,
        station,
    }) = heap.pop()
    {
        if !finalized.insert(station.clone()) {
            continue;
        }
        if station == end {
            break;
        }
        let Ok(current) = net.station(&station) else {
            continue;
        };

        for (next, &distance) in current.adjacent.iter().sorted_by(|a, b| a.0.cmp(b.0)) {
            if finalized.contains(next) {
                continue;
            }
            let mut candidates = net.lines_between(&station, next);
            if candidates.is_empty() {
                continue;
            }
            // Evaluate the incumbent line first so ties keep the ride.
            if let Some(current_line) = &line {
                if let Some(pos) = candidates.iter().position(|l| l == current_line) {
                    let incumbent = candidates.remove(pos);
                    candidates.insert(0, incumbent);
                }
            }

            let mut best: Option<(f64, String)> = None;
            for candidate in candidates {
                let Ok(candidate_line) = net.line(&candidate) else {
                    continue;
                };
                let mut hop = travel_minutes(distance, candidate_line.speed_kmh);
                if next != end {
                    hop += Station::STOP_TIME;
                }
                if line.as_deref().is_some_and(|cur| cur != candidate) {
                    hop += Station::TRANSFER_TIME;
                }
                let total = time + hop;
                if best.as_ref().is_none_or(|(t, _)| total < *t) {
                    best = Some((total, candidate));
                }
            }
            let Some((total, chosen)) = best else {
                continue;
            };

            if best_time.get(next).is_none_or(|&known| total < known) {
                best_time.insert(next.clone(), total);
                previous.insert(next.clone(), station.clone());
                heap.push(State {
                    time: total,
                    line: Some(chosen),
                    station: next.clone(),
                });
            }
        }
    }

    let Some(&total_time) = best_time.get(end) else {
        return Ok(None);
    };

    let mut path = vec![end.to_string()];
    let mut cursor = end.to_string();
    while let Some(prev) = previous.get(&cursor) {
        cursor = prev.clone();
        path.push(cursor.clone());
    }
    path.reverse();

    let lines = optimize_line_choice(net, &path).unwrap_or_default();
    Ok(Some(TimedRoute {
        path,
        lines,
        total_time,
    }))
}
