use crate::aggregates::report::LoadReport;
use crate::stations::locate_station::StationLocator;
use crate::types::period::{Month, Year};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;

/// Values keyed by an owner (hex cell or station id) and a time key.
///
/// Stored as owner -> (time key -> value) so lookups borrow the owner as `&str`.
#[derive(Debug, Clone)]
pub struct TemporalIndex<K, V> {
    entries: HashMap<String, HashMap<K, V>>,
    len: usize,
}

impl<K, V> Default for TemporalIndex<K, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            len: 0,
        }
    }
}

impl<K: Eq + Hash, V> TemporalIndex<K, V> {
    /// Inserts a value. A later insert for the same key replaces the earlier one.
    pub fn insert(&mut self, owner: String, key: K, value: V) {
        if self.entries.entry(owner).or_default().insert(key, value).is_none() {
            self.len += 1;
        }
    }

    pub fn get(&self, owner: &str, key: &K) -> Option<&V> {
        self.entries.get(owner)?.get(key)
    }

    pub fn has_owner(&self, owner: &str) -> bool {
        self.entries.contains_key(owner)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &K, &V)> {
        self.entries
            .iter()
            .flat_map(|(owner, m)| m.iter().map(move |(k, v)| (owner.as_str(), k, v)))
    }

    /// Number of distinct `(owner, key)` entries.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Lightning totals for a month or a year in one hex cell.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LightningSummary {
    pub strike_count: u32,
    /// Fraction of days in the period with at least one strike.
    pub strike_probability: f64,
    pub days_with_strike: Option<u32>,
    pub days_in_period: Option<u32>,
}

/// Every index built from one processed-data directory. Immutable once loaded.
#[derive(Debug, Clone, Default)]
pub struct AggregateIndex {
    pub(crate) stations: StationLocator,
    pub(crate) lightning_daily: TemporalIndex<NaiveDate, u32>,
    pub(crate) lightning_monthly: TemporalIndex<Month, LightningSummary>,
    pub(crate) lightning_yearly: TemporalIndex<Year, LightningSummary>,
    pub(crate) cloud_daily: TemporalIndex<NaiveDate, f64>,
    pub(crate) cloud_monthly: TemporalIndex<Month, f64>,
    pub(crate) cloud_yearly: TemporalIndex<Year, f64>,
    pub(crate) report: LoadReport,
}

impl AggregateIndex {
    pub fn stations(&self) -> &StationLocator {
        &self.stations
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    pub fn lightning_count(&self, cell: &str, date: NaiveDate) -> u32 {
        self.lightning_daily.get(cell, &date).copied().unwrap_or(0)
    }

    pub fn lightning_month(&self, cell: &str, month: Month) -> LightningSummary {
        self.lightning_monthly.get(cell, &month).copied().unwrap_or_default()
    }

    pub fn lightning_year(&self, cell: &str, year: Year) -> LightningSummary {
        self.lightning_yearly.get(cell, &year).copied().unwrap_or_default()
    }

    pub fn cloud_day(&self, station_id: &str, date: NaiveDate) -> Option<f64> {
        self.cloud_daily.get(station_id, &date).copied()
    }

    pub fn cloud_month(&self, station_id: &str, month: Month) -> Option<f64> {
        self.cloud_monthly.get(station_id, &month).copied()
    }

    pub fn cloud_year(&self, station_id: &str, year: Year) -> Option<f64> {
        self.cloud_yearly.get(station_id, &year).copied()
    }

    /// Whether the station has a monthly cloud value for `month` or any daily value inside it.
    pub fn has_cloud_in_month(&self, station_id: &str, month: Month) -> bool {
        if self.cloud_monthly.get(station_id, &month).is_some() {
            return true;
        }
        if !self.cloud_daily.has_owner(station_id) {
            return false;
        }
        month
            .days()
            .is_some_and(|days| days.iter().any(|d| self.cloud_daily.get(station_id, d).is_some()))
    }

    /// Whether the station has cloud data at any granularity.
    pub fn has_any_cloud(&self, station_id: &str) -> bool {
        self.cloud_daily.has_owner(station_id)
            || self.cloud_monthly.has_owner(station_id)
            || self.cloud_yearly.has_owner(station_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temporal_index_last_write_wins() {
        let mut index: TemporalIndex<Year, f64> = TemporalIndex::default();
        index.insert("98210".to_string(), Year(2025), 60.0);
        index.insert("98210".to_string(), Year(2025), 70.0);
        index.insert("98210".to_string(), Year(2024), 50.0);
        assert_eq!(index.get("98210", &Year(2025)), Some(&70.0));
        assert_eq!(index.len(), 2);
        assert!(index.has_owner("98210"));
        assert!(!index.has_owner("98230"));
        assert_eq!(index.iter().count(), 2);
    }

    #[test]
    fn test_missing_lightning_is_zero_filled_and_cloud_is_none() {
        let index = AggregateIndex::default();
        let date = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        assert_eq!(index.lightning_count("871f1b", date), 0);
        assert_eq!(
            index.lightning_month("871f1b", Month(2025, 7)),
            LightningSummary::default()
        );
        assert_eq!(index.lightning_year("871f1b", Year(2025)).strike_probability, 0.0);
        assert_eq!(index.cloud_day("98210", date), None);
        assert_eq!(index.cloud_month("98210", Month(2025, 7)), None);
        assert_eq!(index.cloud_year("98210", Year(2025)), None);
    }

    #[test]
    fn test_cloud_coverage_checks() {
        let mut index = AggregateIndex::default();
        index.cloud_daily.insert(
            "98210".to_string(),
            NaiveDate::from_ymd_opt(2025, 7, 3).unwrap(),
            40.0,
        );
        index
            .cloud_yearly
            .insert("98230".to_string(), Year(2024), 55.0);

        assert!(index.has_cloud_in_month("98210", Month(2025, 7)));
        assert!(!index.has_cloud_in_month("98210", Month(2025, 8)));
        assert!(!index.has_cloud_in_month("98230", Month(2025, 7)));
        assert!(index.has_any_cloud("98230"));
        assert!(!index.has_any_cloud("00000"));
    }
}
