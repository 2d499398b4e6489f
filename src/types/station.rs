//! Defines the cloud observation station as read from the station index, together with
//! the implementations needed to store stations in an `rstar` R-tree.

use rstar::{RTreeObject, AABB};
use serde::{Deserialize, Serialize};

// --- Data Structures ---

/// A cloud observation station.
///
/// Created once by the loader from `station_index.json` and never mutated afterwards.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Station {
    /// Unique station identifier (e.g. "98210").
    pub station_id: String,
    /// Human readable station name.
    pub name: String,
    /// Geographical location of the station.
    pub location: Location,
    /// Whether the upstream index marks the station as active, if reported.
    pub active: Option<bool>,
    /// First observation timestamp reported by the upstream index, if any.
    pub from_ts: Option<String>,
    /// Last observation timestamp reported by the upstream index, if any.
    pub to_ts: Option<String>,
}

/// Represents the geographical location of a station.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Location {
    /// Latitude in decimal degrees (positive for North, negative for South).
    pub latitude: f64,
    /// Longitude in decimal degrees (positive for East, negative for West).
    pub longitude: f64,
}

impl Station {
    pub fn new(station_id: impl Into<String>, name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            station_id: station_id.into(),
            name: name.into(),
            location: Location {
                latitude: lat,
                longitude: lon,
            },
            active: None,
            from_ts: None,
            to_ts: None,
        }
    }
}

// --- R-Tree Implementations ---

/// A station is a degenerate box at its `[latitude, longitude]`.
impl RTreeObject for Station {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.location.latitude, self.location.longitude])
    }
}

