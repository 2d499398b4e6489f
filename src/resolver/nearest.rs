use crate::aggregates::index::AggregateIndex;
use crate::stations::locate_station::StationDistance;
use crate::types::period::Month;
use log::debug;

/// Picks the station whose raw values are reported for a query.
///
/// Preference order: nearest station with cloud data in `month`, then nearest station with any
/// cloud data, then nearest station overall. `None` only when no stations are loaded.
pub(crate) fn select_station(
    index: &AggregateIndex,
    latitude: f64,
    longitude: f64,
    month: Month,
) -> Option<StationDistance<'_>> {
    let locator = index.stations();
    if let Some(found) = locator.nearest_matching(latitude, longitude, |s| {
        index.has_cloud_in_month(&s.station_id, month)
    }) {
        return Some(found);
    }
    if let Some(found) =
        locator.nearest_matching(latitude, longitude, |s| index.has_any_cloud(&s.station_id))
    {
        debug!(
            "No station has cloud data for {}, using nearest station with any data ({})",
            month, found.station.station_id
        );
        return Some(found);
    }
    locator.nearest_matching(latitude, longitude, |_| true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stations::locate_station::StationLocator;
    use crate::types::period::Year;
    use crate::types::station::Station;

    fn index_with(stations: Vec<Station>) -> AggregateIndex {
        AggregateIndex {
            stations: StationLocator::new(stations),
            ..Default::default()
        }
    }

    fn stations() -> Vec<Station> {
        vec![
            Station::new("near", "Near", 59.33, 18.07),
            Station::new("mid", "Mid", 59.40, 18.07),
            Station::new("far", "Far", 59.80, 18.07),
        ]
    }

    #[test]
    fn test_prefers_station_with_data_for_month() {
        let mut index = index_with(stations());
        index.cloud_monthly.insert("mid".into(), Month(2025, 7), 50.0);
        index.cloud_monthly.insert("far".into(), Month(2025, 7), 60.0);
        index.cloud_yearly.insert("near".into(), Year(2025), 40.0);

        let picked = select_station(&index, 59.33, 18.07, Month(2025, 7)).unwrap();
        assert_eq!(picked.station.station_id, "mid");
    }

    #[test]
    fn test_falls_back_to_any_cloud_data() {
        let mut index = index_with(stations());
        index.cloud_yearly.insert("far".into(), Year(2020), 40.0);

        let picked = select_station(&index, 59.33, 18.07, Month(2025, 7)).unwrap();
        assert_eq!(picked.station.station_id, "far");
    }

    #[test]
    fn test_falls_back_to_nearest_overall() {
        let index = index_with(stations());
        let picked = select_station(&index, 59.33, 18.07, Month(2025, 7)).unwrap();
        assert_eq!(picked.station.station_id, "near");
        assert!(picked.distance_km < 1e-9);
    }

    #[test]
    fn test_no_stations() {
        let index = AggregateIndex::default();
        assert!(select_station(&index, 59.33, 18.07, Month(2025, 7)).is_none());
    }
}
