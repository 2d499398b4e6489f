use crate::aggregates::error::LoadError;
use crate::aggregates::fields::{
    parse_bool, parse_count, parse_date, parse_f64, parse_i32, parse_month, parse_or, parse_text,
    Row,
};
use crate::aggregates::index::{AggregateIndex, LightningSummary, TemporalIndex};
use crate::aggregates::report::{FileReport, LoadReport};
use crate::stations::locate_station::StationLocator;
use crate::types::config::DataFiles;
use crate::types::period::{Month, Year};
use crate::types::station::{Location, Station};
use chrono::NaiveDate;
use log::{debug, info, warn};
use serde_json::Value;
use std::hash::Hash;
use std::io;
use std::path::{Path, PathBuf};

/// Reads the processed aggregate files of one directory into an [`AggregateIndex`].
///
/// Daily files are newline-delimited JSON, the rest are single JSON arrays. A missing file
/// produces an empty index; a record that is not an object or lacks a usable required field is
/// skipped and counted in the [`LoadReport`].
#[derive(Debug, Clone)]
pub struct AggregateLoader {
    dir: PathBuf,
    files: DataFiles,
}

/// Rows of one file plus how many raw entries were dropped before field parsing.
struct RawRows {
    rows: Vec<Row>,
    rejected: usize,
}

impl AggregateLoader {
    pub fn new(dir: &Path, files: &DataFiles) -> AggregateLoader {
        AggregateLoader {
            dir: dir.to_path_buf(),
            files: files.clone(),
        }
    }

    /// Loads all files. Blocking; see [`crate::MetricsStore::load_async`] for async hosts.
    pub fn load(&self) -> Result<AggregateIndex, LoadError> {
        let mut report = LoadReport::default();
        let load_start = std::time::Instant::now();

        let rows = self.read_array(&self.files.station_index)?;
        let (stations, file_report) = collect_stations(rows);
        report.stations = self.log_file(&self.files.station_index, file_report);

        let lightning_daily = self.index_file(
            &self.files.lightning_daily,
            self.read_lines(&self.files.lightning_daily)?,
            parse_lightning_daily,
            |r| &mut r.lightning_daily,
            &mut report,
        );
        let lightning_monthly = self.index_file(
            &self.files.lightning_monthly,
            self.read_array(&self.files.lightning_monthly)?,
            parse_lightning_monthly,
            |r| &mut r.lightning_monthly,
            &mut report,
        );
        let lightning_yearly = self.index_file(
            &self.files.lightning_yearly,
            self.read_array(&self.files.lightning_yearly)?,
            parse_lightning_yearly,
            |r| &mut r.lightning_yearly,
            &mut report,
        );
        let cloud_daily = self.index_file(
            &self.files.cloud_daily,
            self.read_lines(&self.files.cloud_daily)?,
            parse_cloud_daily,
            |r| &mut r.cloud_daily,
            &mut report,
        );
        let cloud_monthly = self.index_file(
            &self.files.cloud_monthly,
            self.read_array(&self.files.cloud_monthly)?,
            parse_cloud_monthly,
            |r| &mut r.cloud_monthly,
            &mut report,
        );
        let cloud_yearly = self.index_file(
            &self.files.cloud_yearly,
            self.read_array(&self.files.cloud_yearly)?,
            parse_cloud_yearly,
            |r| &mut r.cloud_yearly,
            &mut report,
        );

        info!(
            "Loaded aggregates from {} in {:?}: {} records, {} skipped",
            self.dir.display(),
            load_start.elapsed(),
            report.total_loaded(),
            report.total_skipped()
        );

        Ok(AggregateIndex {
            stations: StationLocator::new(stations),
            lightning_daily,
            lightning_monthly,
            lightning_yearly,
            cloud_daily,
            cloud_monthly,
            cloud_yearly,
            report,
        })
    }

    fn index_file<K, V, P, S>(
        &self,
        file_name: &str,
        raw: Option<RawRows>,
        parse: P,
        slot: S,
        report: &mut LoadReport,
    ) -> TemporalIndex<K, V>
    where
        K: Eq + Hash,
        P: Fn(&Row) -> Option<(String, K, V)>,
        S: FnOnce(&mut LoadReport) -> &mut FileReport,
    {
        let mut index = TemporalIndex::default();
        let mut file_report = FileReport::default();
        if let Some(raw) = raw {
            file_report.present = true;
            file_report.skipped = raw.rejected;
            for row in &raw.rows {
                match parse(row) {
                    Some((owner, key, value)) => {
                        index.insert(owner, key, value);
                        file_report.loaded += 1;
                    }
                    None => file_report.skipped += 1,
                }
            }
        }
        *slot(report) = self.log_file(file_name, file_report);
        index
    }

    fn log_file(&self, file_name: &str, file_report: FileReport) -> FileReport {
        if !file_report.present {
            warn!(
                "Aggregate file {} not found in {}, using an empty index",
                file_name,
                self.dir.display()
            );
        } else if file_report.skipped > 0 {
            warn!(
                "Skipped {} malformed records in {} ({} loaded)",
                file_report.skipped, file_name, file_report.loaded
            );
        } else {
            info!("Loaded {} records from {}", file_report.loaded, file_name);
        }
        file_report
    }

    /// Reads a file as raw bytes, `None` if it does not exist.
    fn read_existing(&self, file_name: &str) -> Result<Option<(PathBuf, Vec<u8>)>, LoadError> {
        let path = self.dir.join(file_name);
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some((path, bytes))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(LoadError::Read(path, e)),
        }
    }

    /// Newline-delimited JSON. Blank lines are ignored, unparseable lines and non-objects rejected.
    ///
    /// Lines are split as bytes so invalid UTF-8 only rejects the line it appears on.
    fn read_lines(&self, file_name: &str) -> Result<Option<RawRows>, LoadError> {
        let Some((_, bytes)) = self.read_existing(file_name)? else {
            return Ok(None);
        };
        let mut rows = Vec::new();
        let mut rejected = 0;
        for (line_no, line) in bytes.split(|b| *b == b'\n').enumerate() {
            let line = line.trim_ascii();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_slice::<Value>(line) {
                Ok(Value::Object(row)) => rows.push(row),
                Ok(_) => {
                    debug!("{}:{}: not a JSON object", file_name, line_no + 1);
                    rejected += 1;
                }
                Err(e) => {
                    debug!("{}:{}: {}", file_name, line_no + 1, e);
                    rejected += 1;
                }
            }
        }
        Ok(Some(RawRows { rows, rejected }))
    }

    /// A single JSON array of objects. A document that is valid JSON but not an array yields no
    /// rows; a document that is not JSON at all is an error.
    fn read_array(&self, file_name: &str) -> Result<Option<RawRows>, LoadError> {
        let Some((path, bytes)) = self.read_existing(file_name)? else {
            return Ok(None);
        };
        let document: Value =
            serde_json::from_slice(&bytes).map_err(|e| LoadError::Parse(path.clone(), e))?;
        let Value::Array(items) = document else {
            warn!("{} is not a JSON array, ignoring its contents", path.display());
            return Ok(Some(RawRows {
                rows: vec![],
                rejected: 0,
            }));
        };
        let mut rows = Vec::with_capacity(items.len());
        let mut rejected = 0;
        for item in items {
            match item {
                Value::Object(row) => rows.push(row),
                _ => rejected += 1,
            }
        }
        Ok(Some(RawRows { rows, rejected }))
    }
}

fn collect_stations(raw: Option<RawRows>) -> (Vec<Station>, FileReport) {
    let Some(raw) = raw else {
        return (vec![], FileReport::default());
    };
    let mut report = FileReport {
        present: true,
        loaded: 0,
        skipped: raw.rejected,
    };
    let mut stations = Vec::with_capacity(raw.rows.len());
    for row in &raw.rows {
        match parse_station(row) {
            Some(station) => {
                stations.push(station);
                report.loaded += 1;
            }
            None => report.skipped += 1,
        }
    }
    (stations, report)
}

fn parse_station(row: &Row) -> Option<Station> {
    let latitude = parse_f64(row.get("lat")).filter(|lat| (-90.0..=90.0).contains(lat))?;
    let longitude = parse_f64(row.get("lon")).filter(|lon| (-180.0..=180.0).contains(lon))?;
    Some(Station {
        station_id: parse_text(row.get("station_id"))?,
        name: parse_text(row.get("name"))?,
        location: Location {
            latitude,
            longitude,
        },
        active: parse_bool(row.get("active")),
        from_ts: parse_text(row.get("from_ts")),
        to_ts: parse_text(row.get("to_ts")),
    })
}

fn parse_cell(row: &Row) -> Option<String> {
    parse_text(row.get("h3")).map(|cell| cell.to_ascii_lowercase())
}

fn parse_lightning_daily(row: &Row) -> Option<(String, NaiveDate, u32)> {
    let cell = parse_cell(row)?;
    let date = parse_date(row.get("date"))?;
    let strike_count = parse_or(row.get("strike_count"), 0, parse_count)?;
    Some((cell, date, strike_count))
}

/// Parses the fields shared by monthly and yearly lightning rows.
///
/// A missing `strike_probability` is derived from the day counts when both are present.
fn parse_lightning_summary(row: &Row, days_in_period_field: &str) -> Option<LightningSummary> {
    let strike_count = parse_or(row.get("strike_count"), 0, parse_count)?;
    let days_with_strike = parse_count(row.get("days_with_strike"));
    let days_in_period = parse_count(row.get(days_in_period_field));
    let derived = match (days_with_strike, days_in_period) {
        (Some(with), Some(total)) if total > 0 => f64::from(with) / f64::from(total),
        _ => 0.0,
    };
    let strike_probability = parse_or(row.get("strike_probability"), derived, parse_f64)?;
    Some(LightningSummary {
        strike_count,
        strike_probability,
        days_with_strike,
        days_in_period,
    })
}

fn parse_lightning_monthly(row: &Row) -> Option<(String, Month, LightningSummary)> {
    let cell = parse_cell(row)?;
    let year = parse_i32(row.get("year"))?;
    let month = parse_month(row.get("month"))?;
    let summary = parse_lightning_summary(row, "days_in_month")?;
    Some((cell, Month(year, month), summary))
}

fn parse_lightning_yearly(row: &Row) -> Option<(String, Year, LightningSummary)> {
    let cell = parse_cell(row)?;
    let year = parse_i32(row.get("year"))?;
    let summary = parse_lightning_summary(row, "days_in_year")?;
    Some((cell, Year(year), summary))
}

fn parse_cloud_daily(row: &Row) -> Option<(String, NaiveDate, f64)> {
    let station_id = parse_text(row.get("station_id"))?;
    let date = parse_date(row.get("date"))?;
    let cloud = parse_f64(row.get("cloud_mean_pct"))?;
    Some((station_id, date, cloud))
}

fn parse_cloud_monthly(row: &Row) -> Option<(String, Month, f64)> {
    let station_id = parse_text(row.get("station_id"))?;
    let year = parse_i32(row.get("year"))?;
    let month = parse_month(row.get("month"))?;
    let cloud = parse_f64(row.get("cloud_mean_pct"))?;
    Some((station_id, Month(year, month), cloud))
}

fn parse_cloud_yearly(row: &Row) -> Option<(String, Year, f64)> {
    let station_id = parse_text(row.get("station_id"))?;
    let year = parse_i32(row.get("year"))?;
    let cloud = parse_f64(row.get("cloud_mean_pct"))?;
    Some((station_id, Year(year), cloud))
}
