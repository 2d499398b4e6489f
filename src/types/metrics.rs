//! Response objects returned by [`crate::MetricsStore::query`].
//!
//! Every value here is owned; nothing borrows from the loaded indices.

use serde::{Deserialize, Serialize};

/// Echo of the queried point and the hex cell it falls in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointInfo {
    pub lat: f64,
    pub lon: f64,
    /// Hex cell used for the lightning lookups.
    pub h3_cell: String,
}

/// Describes which station fed the cloud numbers.
///
/// For inverse-distance weighting this is the nearest station overall, and `stations_in_range`
/// counts the stations inside the interpolation radius. For nearest-station selection it is the
/// selected station and `stations_in_range` is 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudSource {
    pub policy: String,
    pub station_id: String,
    pub station_name: String,
    /// Distance from the queried point, rounded to 2 decimals.
    pub distance_km: f64,
    pub stations_in_range: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayMetric {
    /// `YYYY-MM-DD`
    pub date: String,
    /// `None` means no cloud coverage, not a clear sky.
    pub cloud_mean_pct: Option<f64>,
    pub lightning_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthMetric {
    pub month: u32,
    pub cloud_mean_pct: Option<f64>,
    pub lightning_probability: f64,
    pub lightning_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearMetric {
    pub year: i32,
    pub cloud_mean_pct: Option<f64>,
    pub lightning_probability: f64,
    pub lightning_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyMetrics {
    pub days: Vec<DayMetric>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyMetrics {
    pub months: Vec<MonthMetric>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyMetrics {
    pub years: Vec<YearMetric>,
}

/// Full answer for one point query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointMetrics {
    pub point: PointInfo,
    pub cloud_source: Option<CloudSource>,
    pub daily: DailyMetrics,
    pub monthly: MonthlyMetrics,
    pub yearly: YearlyMetrics,
}
