use hashbrown::{HashMap, HashSet};

/// A single stop in the network.
///
/// Adjacency is stored per station as `neighbour name -> distance in meters`
/// and is kept symmetric by the loader and the editor: whenever A lists B at
/// distance d, B lists A at the same distance.
#[derive(Debug, Clone, Default)]
pub struct Station {
    pub name: String,
    /// Ids of every line whose sequence contains this station.
    pub lines: HashSet<String>,
    /// Neighbouring station name -> edge distance in meters.
    pub adjacent: HashMap<String, f64>,
}

impl Station {
    /// Minutes lost when switching lines at a station.
    pub const TRANSFER_TIME: f64 = 5.0;
    /// Minutes spent at every intermediate stop.
    pub const STOP_TIME: f64 = 1.0;

    pub fn new(name: impl Into<String>) -> Self {
        Station {
            name: name.into(),
            lines: HashSet::new(),
            adjacent: HashMap::new(),
        }
    }

    pub fn add_line(&mut self, line_id: impl Into<String>) {
        self.lines.insert(line_id.into());
    }

    pub fn remove_line(&mut self, line_id: &str) {
        self.lines.remove(line_id);
    }

    pub fn add_adjacent(&mut self, name: impl Into<String>, distance: f64) {
        self.adjacent.insert(name.into(), distance);
    }

    pub fn remove_adjacent(&mut self, name: &str) -> Option<f64> {
        self.adjacent.remove(name)
    }

    /// Redirects the edge towards `old` to point at `new` instead, used when
    /// a neighbouring station is removed and its two edges are merged.
    pub fn replace_adjacent(&mut self, old: &str, new: impl Into<String>, distance: f64) {
        if self.adjacent.remove(old).is_some() {
            self.adjacent.insert(new.into(), distance);
        }
    }

    pub fn distance_to(&self, name: &str) -> Option<f64> {
        self.adjacent.get(name).copied()
    }

    /// Number of directly connected stations.
    pub fn degree(&self) -> usize {
        self.adjacent.len()
    }
}
