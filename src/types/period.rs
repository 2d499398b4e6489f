//! Calendar keys used by the monthly and yearly aggregate indices.

use crate::utils::days_in_month;
use chrono::NaiveDate;
use std::fmt;
use std::fmt::{Display, Formatter};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct Year(pub i32);

impl Year {
    pub fn get(self) -> i32 {
        self.0
    }

    /// The twelve months of this year, January first.
    pub fn months(self) -> impl Iterator<Item = Month> {
        (1..=12).map(move |m| Month(self.0, m))
    }
}

impl Display for Year {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

/// A calendar month as `(year, month)`, month in `1..=12`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct Month(pub i32, pub u32);

impl Month {
    pub fn year(self) -> i32 {
        self.0
    }
    pub fn month(self) -> u32 {
        self.1
    }

    pub fn of_date(date: NaiveDate) -> Self {
        use chrono::Datelike;
        Self(date.year(), date.month())
    }

    /// Every calendar day of the month, or `None` if the month number is out of range.
    pub fn days(self) -> Option<Vec<NaiveDate>> {
        let last = days_in_month(self.0, self.1)?;
        (1..=last)
            .map(|day| NaiveDate::from_ymd_opt(self.0, self.1, day))
            .collect()
    }
}

impl Display for Month {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.0, self.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leap_february_has_29_days() {
        let days = Month(2024, 2).days().unwrap();
        assert_eq!(days.len(), 29);
        assert_eq!(days.last().unwrap().to_string(), "2024-02-29");
    }

    #[test]
    fn test_invalid_month_has_no_days() {
        assert!(Month(2024, 13).days().is_none());
        assert!(Month(2024, 0).days().is_none());
    }

    #[test]
    fn test_year_months() {
        let months: Vec<Month> = Year(2025).months().collect();
        assert_eq!(months.len(), 12);
        assert_eq!(months[0], Month(2025, 1));
        assert_eq!(months[11].to_string(), "2025-12");
    }
}
