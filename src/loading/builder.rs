use std::path::PathBuf;

use chrono::NaiveTime;
use itertools::Itertools;
use log::{info, warn};

use super::raw_types::RawNetwork;
use crate::error::Error;
use crate::model::{InterchangeLeg, Line, MetroNetwork, Station};

/// Where to find the network description.
#[derive(Debug, Clone)]
pub struct MetroModelConfig {
    pub network_path: PathBuf,
}

/// Reads and parses the network document, then builds a validated network.
///
/// # Errors
///
/// Returns an error if the file is missing or unreadable, the JSON is
/// malformed, or the described network violates the structural invariants.
pub fn create_metro_network(config: &MetroModelConfig) -> Result<MetroNetwork, Error> {
    if !config.network_path.exists() {
        return Err(Error::InvalidData(format!(
            "network file not found: {}",
            config.network_path.display()
        )));
    }
    info!(
        "Loading metro network description: {}",
        config.network_path.display()
    );
    let text = std::fs::read_to_string(&config.network_path)?;
    let raw: RawNetwork = serde_json::from_str(&text)
        .map_err(|e| Error::InvalidData(format!("malformed network document: {e}")))?;
    network_from_raw(raw)
}

/// Builds a [`MetroNetwork`] from an already-parsed document.
///
/// Line sequences come from the chained segments; station entities, line
/// memberships and symmetric adjacency are derived from them. Ring closures
/// are applied and the result is validated before it is returned.
///
/// # Errors
///
/// Returns `InvalidData` for non-positive speeds or distances, broken
/// segment chains and immediate duplicates; `UnknownLine`/`UnknownStation`
/// when an override table references something the document never defines.
pub fn network_from_raw(raw: RawNetwork) -> Result<MetroNetwork, Error> {
    let mut net = MetroNetwork::new();

    for (line_id, raw_line) in raw.lines.into_iter().sorted_by(|a, b| a.0.cmp(&b.0)) {
        if raw_line.speed_kmh <= 0.0 {
            return Err(Error::InvalidData(format!(
                "line {line_id}: speed must be positive"
            )));
        }
        let mut line = Line::new(&line_id, raw_line.speed_kmh);

        for segment in &raw_line.segments {
            if segment.distance_m <= 0.0 {
                return Err(Error::InvalidData(format!(
                    "line {line_id}: segment {} -> {} has non-positive distance",
                    segment.from, segment.to
                )));
            }
            if segment.from == segment.to {
                return Err(Error::InvalidData(format!(
                    "line {line_id}: segment loops on {}",
                    segment.from
                )));
            }
            match line.stations.last() {
                None => {
                    line.stations.push(segment.from.clone());
                }
                Some(tail) if *tail == segment.from => {}
                Some(tail) => {
                    return Err(Error::InvalidData(format!(
                        "line {line_id}: segment {} -> {} does not chain after {tail}",
                        segment.from, segment.to
                    )));
                }
            }
            line.stations.push(segment.to.clone());

            for name in [&segment.from, &segment.to] {
                net.stations
                    .entry(name.clone())
                    .or_insert_with(|| Station::new(name.clone()))
                    .add_line(line_id.as_str());
            }
            net.add_edge(&segment.from, &segment.to, segment.distance_m);
        }

        for (station, times) in raw_line.departures {
            for time in times {
                match NaiveTime::parse_from_str(&time, "%H:%M") {
                    Ok(parsed) => line.add_departure(station.as_str(), parsed),
                    Err(_) => warn!(
                        "line {line_id}: skipping unparsable departure time {time:?} at {station}"
                    ),
                }
            }
        }

        net.lines.insert(line_id, line);
    }

    for (line_id, distance) in raw.circular_closures {
        if !net.lines.contains_key(&line_id) {
            return Err(Error::UnknownLine(line_id));
        }
        if distance <= 0.0 {
            return Err(Error::InvalidData(format!(
                "ring closure for line {line_id} has non-positive distance"
            )));
        }
        net.set_circular_closure(line_id, distance);
    }

    for interchange in raw.direct_interchanges {
        net.station(&interchange.station_a)?;
        net.station(&interchange.station_b)?;
        if !net.lines.contains_key(&interchange.line) {
            return Err(Error::UnknownLine(interchange.line));
        }
        net.add_direct_interchange(
            &interchange.station_a,
            &interchange.station_b,
            InterchangeLeg {
                line: interchange.line,
                speed_kmh: interchange.speed_kmh,
            },
        );
    }

    net.rebuild_derived();
    net.validate()?;
    info!(
        "Metro network loaded: {} stations, {} lines",
        net.stations.len(),
        net.lines.len()
    );
    Ok(net)
}
