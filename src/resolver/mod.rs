//! Spatial resolution of a query point to the station(s) that feed its cloud values.
//!
//! Resolution runs once per query; the result is reused for every day, month and year of the
//! series, only the per-key value lookup changes.

mod idw;
mod nearest;

use crate::aggregates::index::AggregateIndex;
use crate::stations::locate_station::StationDistance;
use crate::types::config::{IdwParams, InterpolationPolicy};
use crate::types::metrics::CloudSource;
use crate::types::period::Month;
use crate::utils::round_to;
use log::debug;

/// Outcome of resolving a point under one [`InterpolationPolicy`].
#[derive(Debug, Clone)]
pub enum CloudResolution<'a> {
    /// Stations inside the IDW radius, nearest first, plus the nearest station overall.
    Weighted {
        params: IdwParams,
        neighbors: Vec<StationDistance<'a>>,
        nearest: Option<StationDistance<'a>>,
    },
    /// The single station whose raw values are reported.
    Nearest(Option<StationDistance<'a>>),
}

impl CloudResolution<'_> {
    /// Cloud value for one time key. `lookup` returns a station's stored value for that key.
    pub fn cloud_value<F>(&self, lookup: F) -> Option<f64>
    where
        F: Fn(&str) -> Option<f64>,
    {
        match self {
            CloudResolution::Weighted {
                params, neighbors, ..
            } => idw::interpolate(neighbors, params, lookup),
            CloudResolution::Nearest(selected) => {
                selected.and_then(|s| lookup(&s.station.station_id))
            }
        }
    }

    /// Descriptor of the station that fed the numbers, `None` when no stations are loaded.
    pub fn source(&self) -> Option<CloudSource> {
        let (policy, reported, stations_in_range) = match self {
            CloudResolution::Weighted {
                neighbors, nearest, ..
            } => ("inverse_distance", nearest.as_ref(), neighbors.len()),
            CloudResolution::Nearest(selected) => {
                ("nearest_station", selected.as_ref(), usize::from(selected.is_some()))
            }
        };
        reported.map(|r| CloudSource {
            policy: policy.to_string(),
            station_id: r.station.station_id.clone(),
            station_name: r.station.name.clone(),
            distance_km: round_to(r.distance_km, 2),
            stations_in_range,
        })
    }
}

/// Resolves query points against the loaded stations.
#[derive(Debug, Clone, Copy)]
pub struct SpatialResolver<'a> {
    index: &'a AggregateIndex,
    policy: InterpolationPolicy,
}

impl<'a> SpatialResolver<'a> {
    pub fn new(index: &'a AggregateIndex, policy: InterpolationPolicy) -> Self {
        Self { index, policy }
    }

    /// Resolves `(latitude, longitude)`. `month` is the requested month; only the
    /// nearest-station policy uses it, to prefer a station with data for that month.
    pub fn resolve(&self, latitude: f64, longitude: f64, month: Month) -> CloudResolution<'a> {
        let resolution = match self.policy {
            InterpolationPolicy::InverseDistance(params) => {
                let locator = self.index.stations();
                let neighbors = locator.within_radius(latitude, longitude, params.max_distance_km);
                let nearest = match neighbors.first() {
                    Some(first) => Some(*first),
                    None => locator.nearest_matching(latitude, longitude, |_| true),
                };
                CloudResolution::Weighted {
                    params,
                    neighbors,
                    nearest,
                }
            }
            InterpolationPolicy::NearestStation => CloudResolution::Nearest(
                nearest::select_station(self.index, latitude, longitude, month),
            ),
        };
        debug!(
            "Resolved ({}, {}) with {}: {:?}",
            latitude,
            longitude,
            self.policy.name(),
            resolution.source()
        );
        resolution
    }
}
