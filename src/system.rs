//! Query/mutation facade over the shared network.
//!
//! Owns the one graph both the planners and the editor touch, behind a
//! read/write lock: queries take the shared side, mutations the exclusive
//! side, and derived state is rebuilt before the exclusive side is
//! released. On top of planner results it layers the fare schedule and a
//! per-pair decaying wait-time estimate.

use std::sync::{Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::NaiveTime;
use hashbrown::HashMap;
use hashbrown::hash_map::Entry;
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::Serialize;

use crate::editing;
use crate::error::Error;
use crate::model::MetroNetwork;
use crate::routing::{self, RouteDetails, Segment};

/// Geometric decay applied to a pair's wait estimate on each repeat query.
const WAIT_DECAY: f64 = 0.8;

/// One planner answer with everything a front end presents: the path and
/// line assignment, per-segment records, totals, fare and the synthetic
/// wait-time estimate.
#[derive(Debug, Clone, Serialize)]
pub struct RouteSummary {
    pub path: Vec<String>,
    pub lines: Vec<String>,
    pub segments: Vec<Segment>,
    pub total_distance: f64,
    pub total_time: f64,
    pub transfers: usize,
    pub fare: u32,
    pub wait_time: f64,
}

/// Per-line snapshot for front ends.
#[derive(Debug, Clone, Serialize)]
pub struct LineOverview {
    pub id: String,
    pub speed_kmh: f64,
    pub stations: Vec<String>,
}

/// Fare in currency units for a trip of `distance_m` meters.
pub fn fare_for_distance(distance_m: f64) -> u32 {
    if distance_m <= 6000.0 {
        3
    } else if distance_m <= 12000.0 {
        4
    } else if distance_m <= 22000.0 {
        5
    } else if distance_m <= 32000.0 {
        6
    } else {
        7 + ((distance_m - 32000.0) / 20000.0).floor() as u32
    }
}

/// Decaying pseudo-estimate of time-to-next-departure, per (start, end)
/// pair. The first query for a pair draws uniformly from [0, 4) minutes;
/// each repeat multiplies the stored value by [`WAIT_DECAY`], modeling a
/// user who has already been waiting. Not a live signal.
struct WaitTimes {
    rng: StdRng,
    pending: HashMap<(String, String), f64>,
}

impl WaitTimes {
    fn seeded(seed: u64) -> Self {
        WaitTimes {
            rng: StdRng::seed_from_u64(seed),
            pending: HashMap::new(),
        }
    }

    fn next(&mut self, start: &str, end: &str) -> f64 {
        match self.pending.entry((start.to_string(), end.to_string())) {
            Entry::Occupied(mut entry) => {
                *entry.get_mut() *= WAIT_DECAY;
                *entry.get()
            }
            Entry::Vacant(entry) => *entry.insert(self.rng.gen_range(0.0..4.0)),
        }
    }
}

pub struct MetroSystem {
    network: RwLock<MetroNetwork>,
    wait: Mutex<WaitTimes>,
}

impl MetroSystem {
    /// Wraps a loader-built network. `wait_seed` fixes the wait-time RNG so
    /// repeated runs (and tests) see the same estimates.
    pub fn new(network: MetroNetwork, wait_seed: u64) -> Self {
        MetroSystem {
            network: RwLock::new(network),
            wait: Mutex::new(WaitTimes::seeded(wait_seed)),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, MetroNetwork> {
        self.network.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, MetroNetwork> {
        self.network.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn wait_estimate(&self, start: &str, end: &str) -> f64 {
        self.wait
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .next(start, end)
    }

    /// Shortest-time plan between two stations, `Ok(None)` when they are
    /// not connected.
    ///
    /// # Errors
    ///
    /// `UnknownStation` for an endpoint absent from the network.
    pub fn shortest_time(&self, start: &str, end: &str) -> Result<Option<RouteSummary>, Error> {
        let summary = {
            let net = self.read();
            let Some(route) = routing::shortest_time_route(&net, start, end)? else {
                return Ok(None);
            };
            let details = routing::route_details(&net, &route.path, &route.lines)?;
            RouteSummary {
                path: route.path,
                lines: route.lines,
                segments: details.segments,
                total_distance: details.total_distance,
                total_time: route.total_time,
                transfers: details.transfers,
                fare: fare_for_distance(details.total_distance),
                wait_time: 0.0,
            }
        };
        let wait_time = self.wait_estimate(start, end);
        Ok(Some(RouteSummary {
            wait_time,
            ..summary
        }))
    }

    /// Every minimum-transfer alternative between two stations, sorted by
    /// total time; `Ok(None)` when they are not connected. All alternatives
    /// of one query share the same wait estimate.
    ///
    /// # Errors
    ///
    /// `UnknownStation` for an endpoint absent from the network.
    pub fn least_transfers(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Option<Vec<RouteSummary>>, Error> {
        let summaries = {
            let net = self.read();
            let Some(alternatives) = routing::least_transfers_routes(&net, start, end)? else {
                return Ok(None);
            };
            alternatives
                .into_iter()
                .map(|alt| {
                    let details = routing::route_details(&net, &alt.path, &alt.lines)?;
                    Ok(RouteSummary {
                        path: alt.path,
                        lines: alt.lines,
                        segments: details.segments,
                        total_distance: details.total_distance,
                        total_time: alt.total_time,
                        transfers: alt.transfers,
                        fare: fare_for_distance(details.total_distance),
                        wait_time: 0.0,
                    })
                })
                .collect::<Result<Vec<_>, Error>>()?
        };
        let wait_time = self.wait_estimate(start, end);
        Ok(Some(
            summaries
                .into_iter()
                .map(|s| RouteSummary { wait_time, ..s })
                .collect(),
        ))
    }

    /// Per-segment expansion of an explicit `(path, lines)` pair. Pure:
    /// never touches the wait-time state.
    ///
    /// # Errors
    ///
    /// See [`routing::route_details`].
    pub fn route_details(&self, path: &[String], lines: &[String]) -> Result<RouteDetails, Error> {
        routing::route_details(&self.read(), path, lines)
    }

    /// # Errors
    ///
    /// See [`editing::add_station`].
    pub fn add_station(
        &self,
        line_id: &str,
        prev: &str,
        next: &str,
        new: &str,
        prev_distance: f64,
        next_distance: f64,
    ) -> Result<(), Error> {
        editing::add_station(
            &mut self.write(),
            line_id,
            prev,
            next,
            new,
            prev_distance,
            next_distance,
        )
    }

    /// # Errors
    ///
    /// See [`editing::extend_line`].
    pub fn extend_line(
        &self,
        line_id: &str,
        terminal: &str,
        new: &str,
        distance: f64,
    ) -> Result<(), Error> {
        editing::extend_line(&mut self.write(), line_id, terminal, new, distance)
    }

    /// # Errors
    ///
    /// See [`editing::remove_station`].
    pub fn remove_station(&self, name: &str) -> Result<(), Error> {
        editing::remove_station(&mut self.write(), name)
    }

    /// Departure times of every station on a line.
    ///
    /// # Errors
    ///
    /// `UnknownLine` for an unknown line id.
    pub fn line_departures(&self, line_id: &str) -> Result<HashMap<String, Vec<NaiveTime>>, Error> {
        let net = self.read();
        let line = net.line(line_id)?;
        Ok(line
            .departures
            .iter()
            .map(|(station, times)| (station.clone(), times.iter().copied().collect()))
            .collect())
    }

    /// Departure times at one station of a line; empty when the station has
    /// no scheduled departures.
    ///
    /// # Errors
    ///
    /// `UnknownLine` for an unknown line id.
    pub fn station_departures(&self, line_id: &str, station: &str) -> Result<Vec<NaiveTime>, Error> {
        let net = self.read();
        let line = net.line(line_id)?;
        Ok(line
            .departures_for(station)
            .map(|times| times.iter().copied().collect())
            .unwrap_or_default())
    }

    /// Per-line snapshot (speed and station sequence) for front ends.
    pub fn network_overview(&self) -> Vec<LineOverview> {
        let net = self.read();
        let mut overview: Vec<LineOverview> = net
            .lines
            .values()
            .map(|line| LineOverview {
                id: line.id.clone(),
                speed_kmh: line.speed_kmh,
                stations: line.stations.clone(),
            })
            .collect();
        overview.sort_by(|a, b| a.id.cmp(&b.id));
        overview
    }
}
