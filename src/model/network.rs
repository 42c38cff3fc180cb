//! The network structure shared by the planners and the editor.

use hashbrown::HashMap;
use itertools::Itertools;

use super::{Line, Station};
use crate::error::Error;

/// One boarding option of a direct two-line interchange pair (see
/// [`MetroNetwork::direct_interchange`]).
#[derive(Debug, Clone)]
pub struct InterchangeLeg {
    pub line: String,
    pub speed_kmh: f64,
}

/// Canonical key for an undirected edge: the station pair in sorted order.
pub fn edge_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

/// The full graph: stations keyed by name, lines keyed by id, plus the two
/// data tables loaded alongside the topology (ring-closure distances and
/// direct-interchange pairs).
///
/// Every structural mutation must go through [`crate::editing`] and finishes
/// with [`MetroNetwork::rebuild_derived`], which reapplies the synthetic
/// ring-closure edges before any query runs against the changed graph.
#[derive(Debug, Clone, Default)]
pub struct MetroNetwork {
    pub stations: HashMap<String, Station>,
    pub lines: HashMap<String, Line>,
    /// Circular line id -> distance in meters of the synthetic edge closing
    /// the ring between the sequence's first and last station.
    circular_closures: HashMap<String, f64>,
    /// Unordered station pair -> boarding options that bypass the general
    /// least-transfers search for that pair.
    direct_interchanges: HashMap<(String, String), Vec<InterchangeLeg>>,
    /// Closure edges currently present in the adjacency maps, so a rebuild
    /// can drop them before reapplying the table.
    applied_closures: HashMap<String, (String, String)>,
}

impl MetroNetwork {
    pub fn new() -> Self {
        MetroNetwork::default()
    }

    pub fn station(&self, name: &str) -> Result<&Station, Error> {
        self.stations
            .get(name)
            .ok_or_else(|| Error::UnknownStation(name.to_string()))
    }

    pub fn station_mut(&mut self, name: &str) -> Result<&mut Station, Error> {
        self.stations
            .get_mut(name)
            .ok_or_else(|| Error::UnknownStation(name.to_string()))
    }

    pub fn line(&self, id: &str) -> Result<&Line, Error> {
        self.lines
            .get(id)
            .ok_or_else(|| Error::UnknownLine(id.to_string()))
    }

    /// Distance of the direct edge between two stations, if one exists.
    pub fn edge_distance(&self, a: &str, b: &str) -> Option<f64> {
        self.stations.get(a).and_then(|s| s.distance_to(b))
    }

    /// Inserts the symmetric edge a<->b, overwriting any previous distance.
    pub(crate) fn add_edge(&mut self, a: &str, b: &str, distance: f64) {
        if let Some(sa) = self.stations.get_mut(a) {
            sa.add_adjacent(b, distance);
        }
        if let Some(sb) = self.stations.get_mut(b) {
            sb.add_adjacent(a, distance);
        }
    }

    pub(crate) fn remove_edge(&mut self, a: &str, b: &str) {
        if let Some(sa) = self.stations.get_mut(a) {
            sa.remove_adjacent(b);
        }
        if let Some(sb) = self.stations.get_mut(b) {
            sb.remove_adjacent(a);
        }
    }

    /// Ids of every line serving both stations, in sorted order so searches
    /// expand candidates deterministically.
    pub fn lines_between(&self, a: &str, b: &str) -> Vec<String> {
        let (Some(sa), Some(sb)) = (self.stations.get(a), self.stations.get(b)) else {
            return Vec::new();
        };
        sa.lines
            .iter()
            .filter(|line| sb.lines.contains(*line))
            .cloned()
            .sorted()
            .collect()
    }

    /// Marks a line as circular, closing first-to-last with the given
    /// distance on the next [`MetroNetwork::rebuild_derived`].
    ///
    /// The override owns the edge between the ring's termini: a rebuild
    /// replaces whatever edge that pair carries (including one loaded from
    /// another line's segments) with the override distance.
    pub fn set_circular_closure(&mut self, line_id: impl Into<String>, distance: f64) {
        self.circular_closures.insert(line_id.into(), distance);
    }

    pub fn add_direct_interchange(&mut self, a: &str, b: &str, leg: InterchangeLeg) {
        self.direct_interchanges
            .entry(edge_key(a, b))
            .or_default()
            .push(leg);
    }

    /// Boarding options for a direct two-line interchange pair, if the pair
    /// was listed in the loaded table. Order of `a`/`b` does not matter.
    pub fn direct_interchange(&self, a: &str, b: &str) -> Option<&[InterchangeLeg]> {
        self.direct_interchanges
            .get(&edge_key(a, b))
            .map(Vec::as_slice)
    }

    /// Reapplies the synthetic ring-closure edges from the override table.
    ///
    /// Called after construction and after every editor mutation, inside the
    /// same exclusive critical section, so no query ever sees a ring with a
    /// stale or missing closure edge. The override distance is authoritative:
    /// it always wins over whatever distance an edit left between the ring's
    /// current termini.
    pub(crate) fn rebuild_derived(&mut self) {
        for (_, (a, b)) in std::mem::take(&mut self.applied_closures) {
            self.remove_edge(&a, &b);
        }

        let closures: Vec<(String, f64)> = self
            .circular_closures
            .iter()
            .map(|(id, d)| (id.clone(), *d))
            .sorted_by(|a, b| a.0.cmp(&b.0))
            .collect();
        for (line_id, distance) in closures {
            let Some(line) = self.lines.get(&line_id) else {
                continue;
            };
            let (Some(first), Some(last)) = (line.stations.first(), line.stations.last()) else {
                continue;
            };
            if first == last {
                continue;
            }
            let (first, last) = (first.clone(), last.clone());
            if !self.stations.contains_key(&first) || !self.stations.contains_key(&last) {
                continue;
            }
            self.add_edge(&first, &last, distance);
            self.applied_closures.insert(line_id, (first, last));
        }
    }

    /// Checks the structural invariants: symmetric adjacency, line
    /// membership consistent with line sequences, and no immediate
    /// duplicates within a sequence.
    pub fn validate(&self) -> Result<(), Error> {
        for (name, station) in &self.stations {
            for (neighbour, &distance) in &station.adjacent {
                let back = self
                    .stations
                    .get(neighbour)
                    .and_then(|n| n.distance_to(name));
                if back != Some(distance) {
                    return Err(Error::InvalidData(format!(
                        "asymmetric edge between {name} and {neighbour}"
                    )));
                }
            }
            for line_id in &station.lines {
                let listed = self.lines.get(line_id).is_some_and(|l| l.contains(name));
                if !listed {
                    return Err(Error::InvalidData(format!(
                        "{name} claims membership of line {line_id} but the line does not list it"
                    )));
                }
            }
        }
        for (id, line) in &self.lines {
            for window in line.stations.windows(2) {
                if window[0] == window[1] {
                    return Err(Error::InvalidData(format!(
                        "line {id} repeats {} at consecutive positions",
                        window[0]
                    )));
                }
            }
            for name in &line.stations {
                let member = self.stations.get(name).is_some_and(|s| s.lines.contains(id));
                if !member {
                    return Err(Error::InvalidData(format!(
                        "line {id} lists {name} but the station does not carry the membership"
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_station_net() -> MetroNetwork {
        let mut net = MetroNetwork::new();
        for name in ["A", "B", "C"] {
            let mut station = Station::new(name);
            station.add_line("L1");
            net.stations.insert(name.to_string(), station);
        }
        let mut line = Line::new("L1", 30.0);
        line.stations = vec!["A".into(), "B".into(), "C".into()];
        net.lines.insert("L1".into(), line);
        net.add_edge("A", "B", 1000.0);
        net.add_edge("B", "C", 2000.0);
        net
    }

    #[test]
    fn edges_are_symmetric() {
        let net = two_station_net();
        assert_eq!(net.edge_distance("A", "B"), Some(1000.0));
        assert_eq!(net.edge_distance("B", "A"), Some(1000.0));
        net.validate().expect("fixture must satisfy the invariants");
    }

    #[test]
    fn closure_edge_follows_the_ring_termini() {
        let mut net = two_station_net();
        net.set_circular_closure("L1", 500.0);
        net.rebuild_derived();
        assert_eq!(net.edge_distance("A", "C"), Some(500.0));

        // Grow the ring; the closure edge must move to the new terminus.
        let mut d = Station::new("D");
        d.add_line("L1");
        net.stations.insert("D".into(), d);
        if let Some(line) = net.lines.get_mut("L1") {
            line.stations.push("D".into());
        }
        net.add_edge("C", "D", 800.0);
        net.rebuild_derived();
        assert_eq!(net.edge_distance("A", "C"), None);
        assert_eq!(net.edge_distance("A", "D"), Some(500.0));
    }

    #[test]
    fn closure_override_owns_the_termini_edge() {
        let mut net = two_station_net();
        net.add_edge("A", "C", 900.0);
        net.set_circular_closure("L1", 500.0);
        net.rebuild_derived();
        assert_eq!(net.edge_distance("A", "C"), Some(500.0));

        // Later rebuilds keep the override, not the displaced edge.
        net.rebuild_derived();
        assert_eq!(net.edge_distance("A", "C"), Some(500.0));
    }

    #[test]
    fn validate_rejects_asymmetric_edges() {
        let mut net = two_station_net();
        if let Some(a) = net.stations.get_mut("A") {
            a.add_adjacent("C", 123.0);
        }
        assert!(matches!(net.validate(), Err(Error::InvalidData(_))));
    }
}
