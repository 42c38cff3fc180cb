use std::collections::BTreeSet;

use chrono::NaiveTime;
use hashbrown::HashMap;

use crate::error::Error;

/// One metro line: an ordered station sequence operated at a single average
/// speed, with optional per-station departure tables.
///
/// Only the forward sequence is stored; the reverse direction is derived on
/// demand so the two can never drift apart.
#[derive(Debug, Clone)]
pub struct Line {
    pub id: String,
    /// Average speed in km/h, used for every hop on this line.
    pub speed_kmh: f64,
    /// Forward station sequence. Never contains immediate duplicates.
    pub stations: Vec<String>,
    /// Station name -> scheduled departure times at that station.
    pub departures: HashMap<String, BTreeSet<NaiveTime>>,
}

impl Line {
    pub fn new(id: impl Into<String>, speed_kmh: f64) -> Self {
        Line {
            id: id.into(),
            speed_kmh,
            stations: Vec::new(),
            departures: HashMap::new(),
        }
    }

    /// The station sequence in the opposite travel direction.
    pub fn reverse_stations(&self) -> Vec<String> {
        self.stations.iter().rev().cloned().collect()
    }

    pub fn contains(&self, station: &str) -> bool {
        self.stations.iter().any(|s| s == station)
    }

    /// Whether `station` is the first or last element of the sequence.
    pub fn is_terminus(&self, station: &str) -> bool {
        self.stations.first().is_some_and(|s| s == station)
            || self.stations.last().is_some_and(|s| s == station)
    }

    /// Index at which a new station must be inserted to land between `prev`
    /// and `next`. Fails unless the two occupy adjacent positions in the
    /// sequence (in either order).
    pub fn insertion_index(&self, prev: &str, next: &str) -> Result<usize, Error> {
        let prev_idx = self
            .stations
            .iter()
            .position(|s| s == prev)
            .ok_or_else(|| {
                Error::InvalidTopology(format!("{prev} is not on line {}", self.id))
            })?;
        let next_idx = self
            .stations
            .iter()
            .position(|s| s == next)
            .ok_or_else(|| {
                Error::InvalidTopology(format!("{next} is not on line {}", self.id))
            })?;
        if prev_idx.abs_diff(next_idx) != 1 {
            return Err(Error::InvalidTopology(format!(
                "{prev} and {next} are not adjacent on line {}",
                self.id
            )));
        }
        Ok(prev_idx.max(next_idx))
    }

    /// Drops a station from the sequence, if present.
    pub fn remove_station(&mut self, station: &str) {
        self.stations.retain(|s| s != station);
        self.departures.remove(station);
    }

    pub fn add_departure(&mut self, station: impl Into<String>, time: NaiveTime) {
        self.departures.entry(station.into()).or_default().insert(time);
    }

    pub fn departures_for(&self, station: &str) -> Option<&BTreeSet<NaiveTime>> {
        self.departures.get(station)
    }
}
