//! The query facade: owns the loaded aggregates and answers point queries against them.

use crate::aggregates::error::LoadError;
use crate::aggregates::index::AggregateIndex;
use crate::aggregates::loader::AggregateLoader;
use crate::aggregates::report::LoadReport;
use crate::error::MetricsError;
use crate::grid::hex_locator::HexCellLocator;
use crate::resolver::SpatialResolver;
use crate::series::builder::SeriesBuilder;
use crate::types::config::{LatLon, StoreConfig};
use crate::types::metrics::{DailyMetrics, MonthlyMetrics, PointInfo, PointMetrics, YearlyMetrics};
use crate::types::period::{Month, Year};
use crate::utils;
use bon::bon;
use log::info;
use std::sync::{Arc, PoisonError, RwLock};

/// Loaded lightning and cloud aggregates plus the configuration to query them.
///
/// Build one per process with [`MetricsStore::load`] and share it by reference. Queries only
/// read; [`MetricsStore::reload`] swaps in a freshly loaded index while queries already running
/// keep the snapshot they started with.
///
/// # Examples
///
/// ```no_run
/// use weather_metrics::{LatLon, MetricsError, MetricsStore, StoreConfig};
///
/// # fn run() -> Result<(), MetricsError> {
/// let store = MetricsStore::load(StoreConfig::builder().processed_dir("data/processed").build())?;
/// let stockholm = LatLon(59.3293, 18.0686);
/// if store.is_in_bounds(stockholm) {
///     let metrics = store.query().location(stockholm).year(2025).month(7).call()?;
///     assert_eq!(metrics.monthly.months.len(), 12);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MetricsStore {
    config: StoreConfig,
    locator: HexCellLocator,
    index: RwLock<Arc<AggregateIndex>>,
}

#[bon]
impl MetricsStore {
    /// Loads every aggregate file under `config.processed_dir`.
    ///
    /// Absent files load as empty indices and malformed records are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::Grid`] if `config.h3_resolution` is not a valid grid resolution.
    /// Returns [`MetricsError::Load`] if an existing file cannot be read, or a whole-document file
    /// is not JSON.
    pub fn load(config: StoreConfig) -> Result<Self, MetricsError> {
        let locator = HexCellLocator::new(config.h3_resolution)?;
        let index = loader_for(&config).load()?;
        Ok(Self::assemble(config, locator, index))
    }

    /// Like [`MetricsStore::load`], with the file reads moved onto the blocking thread pool.
    pub async fn load_async(config: StoreConfig) -> Result<Self, MetricsError> {
        let locator = HexCellLocator::new(config.h3_resolution)?;
        let index = load_blocking(loader_for(&config)).await?;
        Ok(Self::assemble(config, locator, index))
    }

    fn assemble(config: StoreConfig, locator: HexCellLocator, index: AggregateIndex) -> Self {
        info!(
            "Loaded aggregates from '{}' ({} records): {}",
            config.processed_dir.display(),
            index.report().total_loaded(),
            index.report()
        );
        Self {
            config,
            locator,
            index: RwLock::new(Arc::new(index)),
        }
    }

    /// Re-reads the processed directory and replaces the in-memory index.
    ///
    /// On error the current index stays in place.
    pub fn reload(&self) -> Result<(), MetricsError> {
        let index = loader_for(&self.config).load()?;
        self.swap(index);
        Ok(())
    }

    pub async fn reload_async(&self) -> Result<(), MetricsError> {
        let index = load_blocking(loader_for(&self.config)).await?;
        self.swap(index);
        Ok(())
    }

    fn swap(&self, index: AggregateIndex) {
        info!(
            "Reloaded aggregates from '{}': {}",
            self.config.processed_dir.display(),
            index.report()
        );
        let mut guard = self.index.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(index);
    }

    /// The index queries currently run against.
    pub fn snapshot(&self) -> Arc<AggregateIndex> {
        let guard = self.index.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn load_report(&self) -> LoadReport {
        *self.snapshot().report()
    }

    /// Returns `true` if `location` lies inside the configured bounds (edges inclusive).
    pub fn is_in_bounds(&self, location: LatLon) -> bool {
        self.config.bounds.contains(location.0, location.1)
    }

    /// Daily, monthly and yearly metrics for one point.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.location(LatLon)`: **Required.** The queried point.
    /// * `.year(i32)`: **Required.** Year of the daily and monthly series.
    /// * `.month(u32)`: **Required.** Month of the daily series, `1..=12`.
    /// * `.current_year(i32)`: Optional. Upper clamp of the yearly series. Defaults to the local
    ///   calendar year.
    ///
    /// Missing data never fails a query: lightning is zero-filled and cloud values are `None`.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::OutOfBounds`] for points outside the configured bounds, before
    /// any lookup work runs. Returns [`MetricsError::InvalidMonth`] for a month outside `1..=12` and
    /// [`MetricsError::InvalidYear`] for a year the calendar cannot represent.
    #[builder]
    pub fn query(
        &self,
        location: LatLon,
        year: i32,
        month: u32,
        current_year: Option<i32>,
    ) -> Result<PointMetrics, MetricsError> {
        let LatLon(lat, lon) = location;
        if !self.is_in_bounds(location) {
            return Err(MetricsError::OutOfBounds { lat, lon });
        }
        if !(1..=12).contains(&month) {
            return Err(MetricsError::InvalidMonth(month));
        }
        let current_year = current_year.unwrap_or_else(utils::current_year);

        let cell = self.locator.cell_for(lat, lon)?;
        let index = self.snapshot();
        let resolution = SpatialResolver::new(&index, self.config.policy).resolve(
            lat,
            lon,
            Month(year, month),
        );
        let series = SeriesBuilder::new(&index, &cell, &resolution);

        let days = series
            .daily(Month(year, month))
            .ok_or(MetricsError::InvalidYear(year))?;
        let months = series.monthly(Year(year));
        let years = series.yearly(self.config.start_year, year, current_year);

        Ok(PointMetrics {
            cloud_source: resolution.source(),
            point: PointInfo {
                lat,
                lon,
                h3_cell: cell,
            },
            daily: DailyMetrics { days },
            monthly: MonthlyMetrics { months },
            yearly: YearlyMetrics { years },
        })
    }
}

fn loader_for(config: &StoreConfig) -> AggregateLoader {
    AggregateLoader::new(&config.processed_dir, &config.files)
}

async fn load_blocking(loader: AggregateLoader) -> Result<AggregateIndex, LoadError> {
    tokio::task::spawn_blocking(move || loader.load()).await?
}
