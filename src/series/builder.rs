use crate::aggregates::index::AggregateIndex;
use crate::resolver::CloudResolution;
use crate::types::metrics::{DayMetric, MonthMetric, YearMetric};
use crate::types::period::{Month, Year};

/// Joins one resolved point against the temporal indices.
///
/// Lightning is looked up by hex cell and zero-filled when absent. Cloud goes through the
/// resolution and stays `None` when no station has a value.
pub struct SeriesBuilder<'a> {
    index: &'a AggregateIndex,
    cell: &'a str,
    resolution: &'a CloudResolution<'a>,
}

impl<'a> SeriesBuilder<'a> {
    pub fn new(
        index: &'a AggregateIndex,
        cell: &'a str,
        resolution: &'a CloudResolution<'a>,
    ) -> Self {
        Self {
            index,
            cell,
            resolution,
        }
    }

    /// One entry per calendar day of `month`. `None` if the month cannot be represented.
    pub fn daily(&self, month: Month) -> Option<Vec<DayMetric>> {
        let days = month.days()?;
        Some(
            days.into_iter()
                .map(|date| DayMetric {
                    date: date.format("%Y-%m-%d").to_string(),
                    cloud_mean_pct: self
                        .resolution
                        .cloud_value(|station_id| self.index.cloud_day(station_id, date)),
                    lightning_count: self.index.lightning_count(self.cell, date),
                })
                .collect(),
        )
    }

    /// Always twelve entries, January to December of `year`.
    pub fn monthly(&self, year: Year) -> Vec<MonthMetric> {
        year.months()
            .map(|month| {
                let lightning = self.index.lightning_month(self.cell, month);
                MonthMetric {
                    month: month.month(),
                    cloud_mean_pct: self
                        .resolution
                        .cloud_value(|station_id| self.index.cloud_month(station_id, month)),
                    lightning_probability: lightning.strike_probability,
                    lightning_count: lightning.strike_count,
                }
            })
            .collect()
    }

    /// `start_year` through the requested year, clamped to `[start_year, current_year]`.
    ///
    /// The series always holds at least `start_year`, even when it lies after `current_year`.
    pub fn yearly(&self, start_year: i32, requested_year: i32, current_year: i32) -> Vec<YearMetric> {
        let end_year = yearly_end(start_year, requested_year, current_year);
        (start_year..=end_year)
            .map(|y| {
                let year = Year(y);
                let lightning = self.index.lightning_year(self.cell, year);
                YearMetric {
                    year: y,
                    cloud_mean_pct: self
                        .resolution
                        .cloud_value(|station_id| self.index.cloud_year(station_id, year)),
                    lightning_probability: lightning.strike_probability,
                    lightning_count: lightning.strike_count,
                }
            })
            .collect()
    }
}

/// Last year of the yearly series.
pub(crate) fn yearly_end(start_year: i32, requested_year: i32, current_year: i32) -> i32 {
    requested_year.max(start_year).min(current_year).max(start_year)
}
