use crate::aggregates::error::LoadError;
use crate::grid::error::GridError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Load(#[from] LoadError),

    // Rejected before any resolution work runs, distinct from "no data".
    #[error("Location ({lat}, {lon}) is outside the configured bounds")]
    OutOfBounds { lat: f64, lon: f64 },

    #[error("Invalid month {0}, expected 1..=12")]
    InvalidMonth(u32),

    #[error("Year {0} is outside the supported calendar range")]
    InvalidYear(i32),
}
