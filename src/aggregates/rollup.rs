//! Consistency check between the daily lightning counts and the monthly/yearly rollups.
//!
//! Only lightning is checked; cloud aggregates are means and have no daily sum to compare.
//! A period without daily records sums to zero, so a stored zero rollup is consistent.

use crate::aggregates::index::AggregateIndex;
use crate::types::period::{Month, Year};
use chrono::Datelike;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Period of a mismatching rollup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RollupPeriod {
    Month(i32, u32),
    Year(i32),
}

/// A stored monthly or yearly strike count that disagrees with the sum of its daily counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RollupMismatch {
    pub cell: String,
    pub period: RollupPeriod,
    pub stored: u32,
    /// Sum of the daily counts; `None` when no daily record exists for the period.
    pub from_daily: Option<u64>,
}

impl fmt::Display for RollupMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let period = match self.period {
            RollupPeriod::Month(y, m) => Month(y, m).to_string(),
            RollupPeriod::Year(y) => Year(y).to_string(),
        };
        match self.from_daily {
            Some(sum) => write!(
                f,
                "lightning {} {}: stored={}, daily sum={}",
                self.cell, period, self.stored, sum
            ),
            None => write!(
                f,
                "lightning {} {}: stored={}, no daily records",
                self.cell, period, self.stored
            ),
        }
    }
}

impl AggregateIndex {
    /// Compares every monthly and yearly lightning `strike_count` with the daily records.
    ///
    /// Returns the mismatches sorted by cell and period; an empty vector means the files agree.
    pub fn lightning_rollup_mismatches(&self) -> Vec<RollupMismatch> {
        let mut monthly_sums: HashMap<(&str, Month), u64> = HashMap::new();
        let mut yearly_sums: HashMap<(&str, Year), u64> = HashMap::new();
        for (cell, date, count) in self.lightning_daily.iter() {
            *monthly_sums.entry((cell, Month::of_date(*date))).or_default() += u64::from(*count);
            *yearly_sums.entry((cell, Year(date.year()))).or_default() += u64::from(*count);
        }

        let mut mismatches: Vec<RollupMismatch> = Vec::new();
        for (cell, month, summary) in self.lightning_monthly.iter() {
            let from_daily = monthly_sums.get(&(cell, *month)).copied();
            if from_daily.unwrap_or(0) != u64::from(summary.strike_count) {
                mismatches.push(RollupMismatch {
                    cell: cell.to_string(),
                    period: RollupPeriod::Month(month.year(), month.month()),
                    stored: summary.strike_count,
                    from_daily,
                });
            }
        }
        for (cell, year, summary) in self.lightning_yearly.iter() {
            let from_daily = yearly_sums.get(&(cell, *year)).copied();
            if from_daily.unwrap_or(0) != u64::from(summary.strike_count) {
                mismatches.push(RollupMismatch {
                    cell: cell.to_string(),
                    period: RollupPeriod::Year(year.get()),
                    stored: summary.strike_count,
                    from_daily,
                });
            }
        }

        mismatches.sort_by(|a, b| {
            a.cell
                .cmp(&b.cell)
                .then_with(|| period_key(a.period).cmp(&period_key(b.period)))
        });
        mismatches
    }
}

fn period_key(period: RollupPeriod) -> (i32, u32) {
    match period {
        RollupPeriod::Month(y, m) => (y, m),
        RollupPeriod::Year(y) => (y, 13),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregates::index::LightningSummary;
    use chrono::NaiveDate;

    fn summary(strike_count: u32) -> LightningSummary {
        LightningSummary {
            strike_count,
            ..Default::default()
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_consistent_rollups_report_nothing() {
        let mut index = AggregateIndex::default();
        index.lightning_daily.insert("c1".into(), day(2025, 7, 1), 2);
        index.lightning_daily.insert("c1".into(), day(2025, 7, 2), 5);
        index.lightning_daily.insert("c1".into(), day(2025, 8, 9), 1);
        index.lightning_monthly.insert("c1".into(), Month(2025, 7), summary(7));
        index.lightning_monthly.insert("c1".into(), Month(2025, 8), summary(1));
        index.lightning_yearly.insert("c1".into(), Year(2025), summary(8));
        // A zero rollup needs no daily records.
        index.lightning_monthly.insert("c2".into(), Month(2025, 7), summary(0));
        assert!(index.lightning_rollup_mismatches().is_empty());
    }

    #[test]
    fn test_mismatches_are_reported_in_order() {
        let mut index = AggregateIndex::default();
        index.lightning_daily.insert("c1".into(), day(2025, 7, 1), 2);
        index.lightning_monthly.insert("c1".into(), Month(2025, 7), summary(3));
        index.lightning_monthly.insert("c0".into(), Month(2025, 6), summary(1));
        index.lightning_yearly.insert("c1".into(), Year(2025), summary(2));

        let mismatches = index.lightning_rollup_mismatches();
        assert_eq!(mismatches.len(), 2);
        assert_eq!(mismatches[0].cell, "c0");
        assert_eq!(mismatches[0].from_daily, None);
        assert_eq!(mismatches[1].period, RollupPeriod::Month(2025, 7));
        assert_eq!(mismatches[1].from_daily, Some(2));
        assert_eq!(
            mismatches[1].to_string(),
            "lightning c1 2025-07: stored=3, daily sum=2"
        );
    }
}
