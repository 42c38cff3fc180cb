#![allow(dead_code)]

use std::collections::HashMap;

use metroplan::loading::{RawInterchange, RawLine, RawNetwork, RawSegment, network_from_raw};
use metroplan::model::{MetroNetwork, Station};

pub fn segment(from: &str, to: &str, distance_m: f64) -> RawSegment {
    RawSegment {
        from: from.into(),
        to: to.into(),
        distance_m,
    }
}

pub fn line(speed_kmh: f64, segments: Vec<RawSegment>) -> RawLine {
    RawLine {
        speed_kmh,
        segments,
        departures: HashMap::new(),
    }
}

/// The shared fixture:
///
/// ```text
///   L1 (30 km/h):  X --1000-- Y --2000-- Z
///   L2 (45 km/h):  P --1500-- Y --1500-- Q
///   RA (36 km/h):  A --1000-- B --1000-- C
///   RB (60 km/h):  A --2000-- D --2000-- C
///   I1/I2:         M --1200-- N   (both lines, listed as a direct
///                                  interchange pair)
///   W:             isolated station, no edges
/// ```
pub fn fixture() -> MetroNetwork {
    let mut raw = RawNetwork::default();
    raw.lines.insert(
        "L1".into(),
        line(30.0, vec![segment("X", "Y", 1000.0), segment("Y", "Z", 2000.0)]),
    );
    raw.lines.insert(
        "L2".into(),
        line(45.0, vec![segment("P", "Y", 1500.0), segment("Y", "Q", 1500.0)]),
    );
    raw.lines.insert(
        "RA".into(),
        line(36.0, vec![segment("A", "B", 1000.0), segment("B", "C", 1000.0)]),
    );
    raw.lines.insert(
        "RB".into(),
        line(60.0, vec![segment("A", "D", 2000.0), segment("D", "C", 2000.0)]),
    );
    raw.lines
        .insert("I1".into(), line(30.0, vec![segment("M", "N", 1200.0)]));
    raw.lines
        .insert("I2".into(), line(50.0, vec![segment("M", "N", 1200.0)]));
    raw.direct_interchanges.push(RawInterchange {
        station_a: "M".into(),
        station_b: "N".into(),
        line: "I1".into(),
        speed_kmh: 30.0,
    });
    raw.direct_interchanges.push(RawInterchange {
        station_a: "M".into(),
        station_b: "N".into(),
        line: "I2".into(),
        speed_kmh: 50.0,
    });

    let mut net = network_from_raw(raw).expect("fixture is well-formed");
    net.stations.insert("W".to_string(), Station::new("W"));
    net
}
