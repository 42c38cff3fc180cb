mod common;

use common::{fixture, line, segment};
use metroplan::editing::{add_station, extend_line, remove_station};
use metroplan::error::Error;
use metroplan::loading::{RawNetwork, network_from_raw};
use metroplan::routing::shortest_time_route;

#[test]
fn add_station_splits_the_edge() {
    let mut net = fixture();
    add_station(&mut net, "L1", "X", "Y", "V", 400.0, 600.0).expect("X and Y are adjacent on L1");

    assert_eq!(net.edge_distance("X", "Y"), None);
    assert_eq!(net.edge_distance("X", "V"), Some(400.0));
    assert_eq!(net.edge_distance("V", "X"), Some(400.0));
    assert_eq!(net.edge_distance("V", "Y"), Some(600.0));
    assert_eq!(
        net.line("L1").expect("line exists").stations,
        vec!["X", "V", "Y", "Z"]
    );
    assert!(net.station("V").expect("V was created").lines.contains("L1"));
    net.validate().expect("the edit preserves the invariants");
}

#[test]
fn add_station_between_non_adjacent_stations_fails() {
    let mut net = fixture();
    let err = add_station(&mut net, "L1", "X", "Z", "V", 400.0, 600.0);
    assert!(matches!(err, Err(Error::InvalidTopology(_))));
    // Nothing was applied.
    assert_eq!(net.edge_distance("X", "Y"), Some(1000.0));
    assert!(net.station("V").is_err());
}

#[test]
fn add_station_on_unknown_line_fails() {
    let mut net = fixture();
    assert!(matches!(
        add_station(&mut net, "L9", "X", "Y", "V", 400.0, 600.0),
        Err(Error::UnknownLine(_))
    ));
}

#[test]
fn add_station_rejects_existing_names_and_bad_distances() {
    let mut net = fixture();
    assert!(matches!(
        add_station(&mut net, "L1", "X", "Y", "Q", 400.0, 600.0),
        Err(Error::InvalidTopology(_))
    ));
    assert!(matches!(
        add_station(&mut net, "L1", "X", "Y", "V", 0.0, 600.0),
        Err(Error::InvalidData(_))
    ));
}

#[test]
fn extend_line_at_both_termini() {
    let mut net = fixture();
    extend_line(&mut net, "L1", "Z", "Z2", 800.0).expect("Z is a terminus");
    extend_line(&mut net, "L1", "X", "X0", 900.0).expect("X is a terminus");

    assert_eq!(
        net.line("L1").expect("line exists").stations,
        vec!["X0", "X", "Y", "Z", "Z2"]
    );
    assert_eq!(net.edge_distance("Z", "Z2"), Some(800.0));
    assert_eq!(net.edge_distance("X0", "X"), Some(900.0));
    net.validate().expect("the edits preserve the invariants");
}

#[test]
fn extend_line_from_a_middle_station_fails() {
    let mut net = fixture();
    assert!(matches!(
        extend_line(&mut net, "L1", "Y", "V", 800.0),
        Err(Error::InvalidTopology(_))
    ));
    assert!(net.station("V").is_err());
}

#[test]
fn remove_station_merges_the_edges() {
    let mut net = fixture();
    // B sits between A and C with exactly two neighbours.
    remove_station(&mut net, "B").expect("B has degree 2");
    assert_eq!(net.edge_distance("A", "C"), Some(2000.0));
    assert_eq!(net.edge_distance("C", "A"), Some(2000.0));
    assert!(net.station("B").is_err());
    assert_eq!(net.line("RA").expect("line exists").stations, vec!["A", "C"]);
    net.validate().expect("the edit preserves the invariants");
}

#[test]
fn remove_station_with_wrong_degree_fails() {
    let mut net = fixture();
    // X is a terminus with one neighbour.
    assert!(matches!(
        remove_station(&mut net, "X"),
        Err(Error::InvalidTopology(_))
    ));
    // Y is an interchange with four.
    assert!(matches!(
        remove_station(&mut net, "Y"),
        Err(Error::InvalidTopology(_))
    ));
    assert!(matches!(
        remove_station(&mut net, "ghost"),
        Err(Error::UnknownStation(_))
    ));
}

#[test]
fn planner_sees_the_merged_edge_after_removal() {
    let mut net = fixture();
    remove_station(&mut net, "B").expect("B has degree 2");
    let route = shortest_time_route(&net, "A", "C")
        .expect("endpoints exist")
        .expect("still connected");
    assert_eq!(route.path, vec!["A", "C"]);
    // A and C sit on both RA and RB, so the merged edge is rideable on
    // either; the search takes the faster RB (2000 m at 60 km/h) over the
    // two-hop RB detour via D and the slower RA ride.
    assert!((route.total_time - 2.0).abs() < 1e-9);
}

#[test]
fn ring_closure_follows_edits_on_a_circular_line() {
    let mut raw = RawNetwork::default();
    raw.lines.insert(
        "ring".into(),
        line(
            40.0,
            vec![
                segment("R1", "R2", 1000.0),
                segment("R2", "R3", 1000.0),
                segment("R3", "R4", 1000.0),
            ],
        ),
    );
    raw.circular_closures.insert("ring".into(), 1810.0);
    let mut net = network_from_raw(raw).expect("document is well-formed");
    assert_eq!(net.edge_distance("R1", "R4"), Some(1810.0));

    // Extending the ring moves the closure edge to the new terminus.
    extend_line(&mut net, "ring", "R4", "R5", 700.0).expect("R4 is a terminus");
    assert_eq!(net.edge_distance("R1", "R4"), None);
    assert_eq!(net.edge_distance("R1", "R5"), Some(1810.0));
    net.validate().expect("the edit preserves the invariants");
}
