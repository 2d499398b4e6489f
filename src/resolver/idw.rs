use crate::stations::locate_station::StationDistance;
use crate::types::config::IdwParams;
use crate::utils::round_to;

/// Distances below this are treated as the query point sitting on the station.
pub(crate) const COLOCATED_KM: f64 = 1e-9;

/// Inverse-distance weighted cloud value from `neighbors`.
///
/// `neighbors` must already be limited to the interpolation radius and sorted nearest first.
/// Stations without a value for the key are passed over, so each key may blend a different set.
/// A co-located station with a value is returned as-is. The blend is rounded to 2 decimals.
pub(crate) fn interpolate<F>(
    neighbors: &[StationDistance<'_>],
    params: &IdwParams,
    lookup: F,
) -> Option<f64>
where
    F: Fn(&str) -> Option<f64>,
{
    let mut collected: Vec<(f64, f64)> = Vec::with_capacity(params.max_neighbors);
    for neighbor in neighbors {
        if collected.len() >= params.max_neighbors {
            break;
        }
        if neighbor.distance_km > params.max_distance_km {
            break;
        }
        let Some(value) = lookup(&neighbor.station.station_id) else {
            continue;
        };
        if neighbor.distance_km < COLOCATED_KM {
            return Some(value);
        }
        collected.push((neighbor.distance_km, value));
    }

    if collected.is_empty() {
        return None;
    }

    let mut weight_sum = 0.0;
    let mut weighted_value_sum = 0.0;
    for (distance, value) in &collected {
        let w = 1.0 / distance.powf(params.power);
        weight_sum += w;
        weighted_value_sum += w * value;
    }
    Some(round_to(weighted_value_sum / weight_sum, 2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::station::Station;

    fn params() -> IdwParams {
        IdwParams::default()
    }

    fn value_of<'a>(values: &'a [(&'a str, f64)]) -> impl Fn(&str) -> Option<f64> + 'a {
        move |id| values.iter().find(|(s, _)| *s == id).map(|(_, v)| *v)
    }

    #[test]
    fn test_two_station_blend() {
        let a = Station::new("a", "A", 0.0, 0.0);
        let b = Station::new("b", "B", 0.0, 0.0);
        let neighbors = [
            StationDistance {
                station: &a,
                distance_km: 1.0,
            },
            StationDistance {
                station: &b,
                distance_km: 2.0,
            },
        ];
        let values = [("a", 80.0), ("b", 60.0)];
        // (80/1 + 60/4) / (1 + 1/4) = 95 / 1.25
        assert_eq!(interpolate(&neighbors, &params(), value_of(&values)), Some(76.0));
    }

    #[test]
    fn test_colocated_station_short_circuits() {
        let a = Station::new("a", "A", 0.0, 0.0);
        let b = Station::new("b", "B", 0.0, 0.0);
        let neighbors = [
            StationDistance {
                station: &a,
                distance_km: 0.0,
            },
            StationDistance {
                station: &b,
                distance_km: 1.0,
            },
        ];
        let values = [("a", 33.333), ("b", 90.0)];
        assert_eq!(interpolate(&neighbors, &params(), value_of(&values)), Some(33.333));
    }

    #[test]
    fn test_missing_values_are_passed_over() {
        let a = Station::new("a", "A", 0.0, 0.0);
        let b = Station::new("b", "B", 0.0, 0.0);
        let neighbors = [
            StationDistance {
                station: &a,
                distance_km: 0.0,
            },
            StationDistance {
                station: &b,
                distance_km: 3.0,
            },
        ];
        let values = [("b", 45.678)];
        assert_eq!(interpolate(&neighbors, &params(), value_of(&values)), Some(45.68));
        assert_eq!(interpolate(&neighbors, &params(), |_| None), None);
    }

    #[test]
    fn test_max_neighbors_and_radius() {
        let stations: Vec<Station> = (0..4)
            .map(|i| Station::new(format!("s{i}"), "S", 0.0, 0.0))
            .collect();
        let neighbors: Vec<StationDistance<'_>> = stations
            .iter()
            .enumerate()
            .map(|(i, station)| StationDistance {
                station,
                distance_km: 10.0 * (i + 1) as f64,
            })
            .collect();
        let values = [("s0", 10.0), ("s1", 10.0), ("s2", 100.0), ("s3", 100.0)];

        let two = IdwParams::builder().max_neighbors(2).build();
        assert_eq!(interpolate(&neighbors, &two, value_of(&values)), Some(10.0));

        let near = IdwParams::builder().max_distance_km(25.0).build();
        assert_eq!(interpolate(&neighbors, &near, value_of(&values)), Some(10.0));

        let none = IdwParams::builder().max_neighbors(0).build();
        assert_eq!(interpolate(&neighbors, &none, value_of(&values)), None);
    }
}
