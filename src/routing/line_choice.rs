use itertools::Itertools;

use crate::model::MetroNetwork;

/// Transfer-minimal line assignment for an already-fixed station path.
///
/// Dynamic program over hops: starting any line serving hop 0 costs
/// nothing; continuing on the same line is free and switching costs one.
/// Backtracks from the cheapest last-hop line. Candidate sets come sorted
/// from [`MetroNetwork::lines_between`], so ties resolve the same way on
/// every run.
///
/// Returns `None` when some hop has no line serving both of its stations
/// (possible after edits merge a cross-line edge); a path shorter than one
/// hop yields an empty assignment.
pub(crate) fn optimize_line_choice(net: &MetroNetwork, path: &[String]) -> Option<Vec<String>> {
    if path.len() < 2 {
        return Some(Vec::new());
    }
    let hops: Vec<Vec<String>> = path
        .iter()
        .tuple_windows()
        .map(|(a, b)| net.lines_between(a, b))
        .collect();
    if hops.iter().any(Vec::is_empty) {
        return None;
    }

    // cost[i][j]: fewest transfers over hops 0..=i ending on hops[i][j];
    // parent[i][j]: index into hops[i-1] that achieved it.
    let mut cost: Vec<Vec<usize>> = Vec::with_capacity(hops.len());
    let mut parent: Vec<Vec<usize>> = Vec::with_capacity(hops.len());
    cost.push(vec![0; hops[0].len()]);
    parent.push(vec![usize::MAX; hops[0].len()]);

    for i in 1..hops.len() {
        let mut row = vec![usize::MAX; hops[i].len()];
        let mut back = vec![usize::MAX; hops[i].len()];
        for (j, line) in hops[i].iter().enumerate() {
            for (k, prev) in hops[i - 1].iter().enumerate() {
                let candidate = cost[i - 1][k].saturating_add(usize::from(line != prev));
                if candidate < row[j] {
                    row[j] = candidate;
                    back[j] = k;
                }
            }
        }
        cost.push(row);
        parent.push(back);
    }

    let (mut best, _) = cost
        .last()?
        .iter()
        .enumerate()
        .min_by_key(|&(_, c)| *c)?;
    let mut assignment = vec![String::new(); hops.len()];
    for i in (0..hops.len()).rev() {
        assignment[i] = hops[i][best].clone();
        if i > 0 {
            best = parent[i][best];
        }
    }
    Some(assignment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loading::{RawLine, RawNetwork, RawSegment, network_from_raw};
    use std::collections::HashMap;

    fn segment(from: &str, to: &str) -> RawSegment {
        RawSegment {
            from: from.into(),
            to: to.into(),
            distance_m: 1000.0,
        }
    }

    /// Express line E covers A..D alongside the stopping line S, while a
    /// third line T only serves the middle hop.
    fn overlapping_net() -> MetroNetwork {
        let mut raw = RawNetwork::default();
        for (id, speed) in [("E", 60.0), ("S", 30.0)] {
            raw.lines.insert(
                id.into(),
                RawLine {
                    speed_kmh: speed,
                    segments: vec![segment("A", "B"), segment("B", "C"), segment("C", "D")],
                    departures: HashMap::new(),
                },
            );
        }
        raw.lines.insert(
            "T".into(),
            RawLine {
                speed_kmh: 45.0,
                segments: vec![segment("B", "C")],
                departures: HashMap::new(),
            },
        );
        network_from_raw(raw).expect("fixture is well-formed")
    }

    #[test]
    fn single_line_assignment_beats_hop_local_choices() {
        let net = overlapping_net();
        let path: Vec<String> = ["A", "B", "C", "D"].map(String::from).to_vec();
        let lines = optimize_line_choice(&net, &path).expect("every hop is served");
        // Every hop must use the same line; "E" sorts before "S".
        assert_eq!(lines, vec!["E", "E", "E"]);
    }

    #[test]
    fn empty_and_single_station_paths_need_no_lines() {
        let net = overlapping_net();
        assert_eq!(optimize_line_choice(&net, &[]), Some(Vec::new()));
        assert_eq!(
            optimize_line_choice(&net, &["A".to_string()]),
            Some(Vec::new())
        );
    }

    #[test]
    fn unserved_hop_yields_none() {
        let mut net = overlapping_net();
        // Fabricate an edge no line serves.
        net.stations
            .insert("X".to_string(), crate::model::Station::new("X"));
        net.add_edge("D", "X", 500.0);
        let path: Vec<String> = ["C", "D", "X"].map(String::from).to_vec();
        assert_eq!(optimize_line_choice(&net, &path), None);
    }
}
