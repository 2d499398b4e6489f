use crate::types::station::Station;
use haversine::{distance, Location as HaversineLocation, Units};
use ordered_float::OrderedFloat;
use rstar::{RTree, AABB};

/// Mean kilometres per degree of latitude on a 6371 km sphere.
const KM_PER_DEGREE: f64 = 111.194_926_644_558_73;

/// Great-circle distance in kilometres between two points (Earth radius 6371 km).
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    distance(
        HaversineLocation {
            latitude: lat1,
            longitude: lon1,
        },
        HaversineLocation {
            latitude: lat2,
            longitude: lon2,
        },
        Units::Kilometers,
    )
}

/// A station paired with its distance to a query point.
#[derive(Debug, Clone, Copy)]
pub struct StationDistance<'a> {
    pub station: &'a Station,
    pub distance_km: f64,
}

impl StationDistance<'_> {
    fn sort_key(&self) -> (OrderedFloat<f64>, &str) {
        (OrderedFloat(self.distance_km), self.station.station_id.as_str())
    }
}

/// Spatial index over the loaded stations.
///
/// All results are ordered by haversine distance ascending, ties broken by `station_id`
/// ascending, so the order never depends on load order.
#[derive(Debug, Clone)]
pub struct StationLocator {
    rtree: RTree<Station>,
}

impl StationLocator {
    pub fn new(stations: Vec<Station>) -> Self {
        Self {
            rtree: RTree::bulk_load(stations),
        }
    }

    pub fn len(&self) -> usize {
        self.rtree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.rtree.size() == 0
    }

    pub fn stations(&self) -> impl Iterator<Item = &Station> {
        self.rtree.iter()
    }

    /// Every station, nearest first.
    pub fn all_by_distance(&self, latitude: f64, longitude: f64) -> Vec<StationDistance<'_>> {
        let candidates = self
            .rtree
            .iter()
            .map(|station| Self::measure(station, latitude, longitude))
            .collect();
        Self::sorted(candidates)
    }

    /// Stations within `max_distance_km`, nearest first.
    ///
    /// The R-tree is queried with a lat/lon box that is guaranteed to contain the search circle,
    /// then every candidate is checked with the exact haversine distance.
    pub fn within_radius(
        &self,
        latitude: f64,
        longitude: f64,
        max_distance_km: f64,
    ) -> Vec<StationDistance<'_>> {
        if !(max_distance_km >= 0.0) {
            return vec![];
        }
        let envelope = Self::search_envelope(latitude, longitude, max_distance_km);
        let candidates = self
            .rtree
            .locate_in_envelope(&envelope)
            .map(|station| Self::measure(station, latitude, longitude))
            .filter(|c| c.distance_km <= max_distance_km)
            .collect();
        Self::sorted(candidates)
    }

    /// Nearest station that satisfies `predicate`.
    pub fn nearest_matching<F>(
        &self,
        latitude: f64,
        longitude: f64,
        predicate: F,
    ) -> Option<StationDistance<'_>>
    where
        F: Fn(&Station) -> bool,
    {
        self.rtree
            .iter()
            .filter(|station| predicate(station))
            .map(|station| Self::measure(station, latitude, longitude))
            .min_by(|a, b| a.sort_key().cmp(&b.sort_key()))
    }

    fn measure(station: &Station, latitude: f64, longitude: f64) -> StationDistance<'_> {
        StationDistance {
            station,
            distance_km: haversine_km(
                latitude,
                longitude,
                station.location.latitude,
                station.location.longitude,
            ),
        }
    }

    fn sorted(mut candidates: Vec<StationDistance<'_>>) -> Vec<StationDistance<'_>> {
        candidates.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        candidates
    }

    /// Bounding box around the search circle, padded by 1% plus a small margin.
    /// Falls back to the full longitude range near the poles or across the antimeridian.
    fn search_envelope(latitude: f64, longitude: f64, max_distance_km: f64) -> AABB<[f64; 2]> {
        let lat_delta = max_distance_km * 1.01 / KM_PER_DEGREE + 1e-6;
        let min_lat = (latitude - lat_delta).max(-90.0);
        let max_lat = (latitude + lat_delta).min(90.0);

        let widest_lat = latitude.abs() + lat_delta;
        let (min_lon, max_lon) = if widest_lat >= 89.0 {
            (-180.0, 180.0)
        } else {
            let lon_delta = lat_delta / widest_lat.to_radians().cos();
            if lon_delta >= 180.0 || longitude - lon_delta < -180.0 || longitude + lon_delta > 180.0
            {
                (-180.0, 180.0)
            } else {
                (longitude - lon_delta, longitude + lon_delta)
            }
        };
        AABB::from_corners([min_lat, min_lon], [max_lat, max_lon])
    }
}

impl Default for StationLocator {
    fn default() -> Self {
        StationLocator::new(vec![])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_locator() -> StationLocator {
        StationLocator::new(vec![
            Station::new("98230", "Bromma", 59.354, 17.942),
            Station::new("98210", "Stockholm A", 59.353, 18.063),
            Station::new("71420", "Göteborg A", 57.7156, 11.9924),
            Station::new("97400", "Arlanda", 59.6536, 17.9456),
            Station::new("180940", "Kiruna", 67.8275, 20.3356),
        ])
    }

    fn validate_results(results: &[StationDistance<'_>], max_distance_km: f64) {
        let mut last_dist = -1.0;
        for (i, c) in results.iter().enumerate() {
            assert!(
                c.distance_km <= max_distance_km + 1e-9,
                "Result {} ({}) distance {} > max {}",
                i,
                c.station.station_id,
                c.distance_km,
                max_distance_km
            );
            assert!(
                c.distance_km >= last_dist - 1e-9,
                "Result {} ({}) distance {} < previous {}",
                i,
                c.station.station_id,
                c.distance_km,
                last_dist
            );
            last_dist = c.distance_km;
        }
    }

    #[test]
    fn test_haversine_stockholm_gothenburg() {
        let d = haversine_km(59.3293, 18.0686, 57.7089, 11.9746);
        assert!((390.0..=410.0).contains(&d), "distance was {d}");
    }

    #[test]
    fn test_haversine_symmetric_and_zero() {
        let a = (59.3293, 18.0686);
        let b = (67.8558, 20.2253);
        let ab = haversine_km(a.0, a.1, b.0, b.1);
        let ba = haversine_km(b.0, b.1, a.0, a.1);
        assert!((ab - ba).abs() < 1e-9);
        assert_eq!(haversine_km(a.0, a.1, a.0, a.1), 0.0);
    }

    #[test]
    fn test_within_radius_sorted_and_bounded() {
        let locator = sample_locator();
        let results = locator.within_radius(59.3293, 18.0686, 50.0);
        validate_results(&results, 50.0);
        let ids: Vec<&str> = results.iter().map(|c| c.station.station_id.as_str()).collect();
        assert_eq!(ids, vec!["98210", "98230", "97400"]);
    }

    #[test]
    fn test_within_radius_matches_full_scan() {
        let locator = sample_locator();
        for radius in [1.0, 10.0, 150.0, 500.0, 2000.0] {
            let fast: Vec<&str> = locator
                .within_radius(60.0, 16.0, radius)
                .iter()
                .map(|c| c.station.station_id.as_str())
                .collect();
            let slow: Vec<&str> = locator
                .all_by_distance(60.0, 16.0)
                .iter()
                .filter(|c| c.distance_km <= radius)
                .map(|c| c.station.station_id.as_str())
                .collect();
            assert_eq!(fast, slow, "radius {radius}");
        }
    }

    #[test]
    fn test_no_results_tight_radius() {
        let locator = sample_locator();
        assert!(locator.within_radius(63.0, 15.0, 1.0).is_empty());
        assert!(locator.within_radius(63.0, 15.0, -1.0).is_empty());
    }

    #[test]
    fn test_ties_broken_by_station_id() {
        let locator = StationLocator::new(vec![
            Station::new("b", "Mast B", 60.0, 16.5),
            Station::new("a", "Mast A", 60.0, 16.5),
        ]);
        let all = locator.all_by_distance(60.0, 16.0);
        assert_eq!(all[0].station.station_id, "a");
        let nearest = locator.nearest_matching(60.0, 16.0, |_| true).unwrap();
        assert_eq!(nearest.station.station_id, "a");
    }

    #[test]
    fn test_nearest_matching_respects_predicate() {
        let locator = sample_locator();
        let nearest = locator
            .nearest_matching(59.3293, 18.0686, |s| s.station_id != "98210")
            .unwrap();
        assert_eq!(nearest.station.station_id, "98230");
        assert!(locator.nearest_matching(59.0, 18.0, |_| false).is_none());
    }

    #[test]
    fn test_empty_locator() {
        let locator = StationLocator::new(vec![]);
        assert!(locator.is_empty());
        assert!(locator.all_by_distance(59.0, 18.0).is_empty());
        assert!(locator.within_radius(59.0, 18.0, 150.0).is_empty());
    }
}
