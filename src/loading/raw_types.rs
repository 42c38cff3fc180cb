use std::collections::HashMap;

use serde::Deserialize;

/// Top-level network document.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct RawNetwork {
    pub lines: HashMap<String, RawLine>,
    /// Circular line id -> distance in meters closing first-to-last.
    pub circular_closures: HashMap<String, f64>,
    /// Station pairs whose least-transfers answer is the listed single-hop
    /// boarding options instead of a general search.
    pub direct_interchanges: Vec<RawInterchange>,
}

#[derive(Debug, Deserialize)]
pub struct RawLine {
    pub speed_kmh: f64,
    /// Chained segments: each `from` must equal the previous `to`.
    pub segments: Vec<RawSegment>,
    /// Station name -> departure times as `"HH:MM"` strings.
    #[serde(default)]
    pub departures: HashMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSegment {
    pub from: String,
    pub to: String,
    pub distance_m: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawInterchange {
    pub station_a: String,
    pub station_b: String,
    pub line: String,
    pub speed_kmh: f64,
}
