mod aggregates;
mod error;
mod grid;
mod metrics_store;
mod resolver;
mod series;
mod stations;
mod types;
mod utils;

pub use error::MetricsError;
pub use metrics_store::MetricsStore;

pub use types::config::*;
pub use types::metrics::*;
pub use types::period::{Month, Year};
pub use types::station::*;

pub use aggregates::index::{AggregateIndex, LightningSummary, TemporalIndex};
pub use aggregates::loader::AggregateLoader;
pub use aggregates::report::{FileReport, LoadReport};
pub use aggregates::rollup::{RollupMismatch, RollupPeriod};
pub use grid::hex_locator::HexCellLocator;
pub use resolver::{CloudResolution, SpatialResolver};
pub use series::builder::SeriesBuilder;
pub use stations::locate_station::{haversine_km, StationDistance, StationLocator};

pub use aggregates::error::LoadError;
pub use grid::error::GridError;
