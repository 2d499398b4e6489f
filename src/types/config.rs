//! Configuration consumed by [`crate::MetricsStore`].

use bon::Builder;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
///
/// # Examples
///
/// ```
/// use weather_metrics::LatLon;
///
/// let stockholm = LatLon(59.3293, 18.0686);
/// assert_eq!(stockholm.0, 59.3293); // Latitude
/// assert_eq!(stockholm.1, 18.0686); // Longitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon(pub f64, pub f64);

/// A rectangular latitude/longitude box. Edges are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Bounds {
    /// The mainland Sweden box the processed data set covers.
    pub const SWEDEN: Bounds = Bounds {
        min_lat: 55.0,
        max_lat: 69.5,
        min_lon: 10.5,
        max_lon: 24.5,
    };

    /// Returns `true` if the point lies inside the box. Non-finite input is never inside.
    ///
    /// ```
    /// use weather_metrics::Bounds;
    ///
    /// assert!(Bounds::SWEDEN.contains(59.3293, 18.0686));
    /// assert!(!Bounds::SWEDEN.contains(10.0, 10.0));
    /// ```
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        self.min_lat <= lat && lat <= self.max_lat && self.min_lon <= lon && lon <= self.max_lon
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Bounds::SWEDEN
    }
}

/// Parameters of inverse-distance weighting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Builder)]
#[serde(default)]
pub struct IdwParams {
    /// Exponent applied to the distance in `1 / d^power`.
    #[builder(default = 2.0)]
    pub power: f64,
    /// Maximum number of stations blended per value.
    #[builder(default = 6)]
    pub max_neighbors: usize,
    /// Stations farther away than this never contribute.
    #[builder(default = 150.0)]
    pub max_distance_km: f64,
}

impl Default for IdwParams {
    fn default() -> Self {
        IdwParams::builder().build()
    }
}

/// How cloud values are derived from nearby stations.
///
/// [`InterpolationPolicy::InverseDistance`] is the default. [`InterpolationPolicy::NearestStation`]
/// is the alternative that reports the raw values of a single station instead of a blend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InterpolationPolicy {
    /// Blend up to `max_neighbors` stations within `max_distance_km`, weighted by `1 / d^power`.
    InverseDistance(IdwParams),
    /// Use the nearest station with data for the requested month, falling back to the nearest
    /// station with any cloud data, then to the nearest station overall.
    NearestStation,
}

impl InterpolationPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            InterpolationPolicy::InverseDistance(_) => "inverse_distance",
            InterpolationPolicy::NearestStation => "nearest_station",
        }
    }
}

impl Default for InterpolationPolicy {
    fn default() -> Self {
        InterpolationPolicy::InverseDistance(IdwParams::default())
    }
}

/// File names of the processed aggregates, relative to [`StoreConfig::processed_dir`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[serde(default)]
pub struct DataFiles {
    #[builder(into, default = "station_index.json".to_owned())]
    pub station_index: String,
    #[builder(into, default = "lightning_h3_r7_daily.jsonl".to_owned())]
    pub lightning_daily: String,
    #[builder(into, default = "lightning_h3_r7_monthly.json".to_owned())]
    pub lightning_monthly: String,
    #[builder(into, default = "lightning_h3_r7_yearly.json".to_owned())]
    pub lightning_yearly: String,
    #[builder(into, default = "cloud_station_daily.jsonl".to_owned())]
    pub cloud_daily: String,
    #[builder(into, default = "cloud_station_monthly.json".to_owned())]
    pub cloud_monthly: String,
    #[builder(into, default = "cloud_station_yearly.json".to_owned())]
    pub cloud_yearly: String,
}

impl Default for DataFiles {
    fn default() -> Self {
        DataFiles::builder().build()
    }
}

fn default_start_year() -> i32 {
    2023
}

fn default_h3_resolution() -> u8 {
    7
}

/// Everything a [`crate::MetricsStore`] needs to load and answer queries.
///
/// # Examples
///
/// ```
/// use weather_metrics::{Bounds, InterpolationPolicy, StoreConfig};
///
/// let config = StoreConfig::builder()
///     .processed_dir("data/processed")
///     .start_year(2023)
///     .policy(InterpolationPolicy::NearestStation)
///     .build();
/// assert_eq!(config.h3_resolution, 7);
/// assert_eq!(config.bounds, Bounds::SWEDEN);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
pub struct StoreConfig {
    /// Directory holding the processed aggregate files.
    #[builder(into)]
    pub processed_dir: PathBuf,
    #[builder(default)]
    #[serde(default)]
    pub bounds: Bounds,
    /// First year of the yearly series.
    #[builder(default = default_start_year())]
    #[serde(default = "default_start_year")]
    pub start_year: i32,
    /// Hex grid resolution the lightning aggregates were bucketed at (0..=15).
    #[builder(default = default_h3_resolution())]
    #[serde(default = "default_h3_resolution")]
    pub h3_resolution: u8,
    #[builder(default)]
    #[serde(default)]
    pub policy: InterpolationPolicy,
    #[builder(default)]
    #[serde(default)]
    pub files: DataFiles,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_edges_are_inclusive() {
        let b = Bounds::SWEDEN;
        assert!(b.contains(55.0, 10.5));
        assert!(b.contains(69.5, 24.5));
        assert!(!b.contains(54.999, 15.0));
        assert!(!b.contains(60.0, 24.501));
        assert!(!b.contains(f64::NAN, 15.0));
    }

    #[test]
    fn test_config_from_json_uses_defaults() {
        let config: StoreConfig =
            serde_json::from_str(r#"{"processed_dir": "/srv/weather/processed"}"#).unwrap();
        assert_eq!(config.start_year, 2023);
        assert_eq!(config.h3_resolution, 7);
        assert_eq!(config.bounds, Bounds::SWEDEN);
        assert_eq!(config.files.cloud_daily, "cloud_station_daily.jsonl");
        match config.policy {
            InterpolationPolicy::InverseDistance(p) => {
                assert_eq!(p.power, 2.0);
                assert_eq!(p.max_neighbors, 6);
                assert_eq!(p.max_distance_km, 150.0);
            }
            other => panic!("unexpected default policy {other:?}"),
        }
    }

    #[test]
    fn test_config_from_json_with_nearest_policy() {
        let config: StoreConfig = serde_json::from_str(
            r#"{
                "processed_dir": "p",
                "start_year": 2020,
                "policy": {"kind": "nearest_station"},
                "files": {"lightning_daily": "lightning_h3_r8_daily.jsonl"}
            }"#,
        )
        .unwrap();
        assert_eq!(config.start_year, 2020);
        assert_eq!(config.policy, InterpolationPolicy::NearestStation);
        assert_eq!(config.files.lightning_daily, "lightning_h3_r8_daily.jsonl");
        assert_eq!(config.files.station_index, "station_index.json");
    }

    #[test]
    fn test_idw_policy_from_json_partial_params() {
        let policy: InterpolationPolicy =
            serde_json::from_str(r#"{"kind": "inverse_distance", "power": 3.0}"#).unwrap();
        assert_eq!(
            policy,
            InterpolationPolicy::InverseDistance(IdwParams {
                power: 3.0,
                max_neighbors: 6,
                max_distance_km: 150.0
            })
        );
    }
}
