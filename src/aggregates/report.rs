use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of loading a single aggregate file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FileReport {
    /// `false` when the file did not exist and an empty index was used instead.
    pub present: bool,
    pub loaded: usize,
    pub skipped: usize,
}

impl fmt::Display for FileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.present {
            write!(f, "{} loaded, {} skipped", self.loaded, self.skipped)
        } else {
            write!(f, "missing")
        }
    }
}

/// Per-file load counts for one processed-data directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LoadReport {
    pub stations: FileReport,
    pub lightning_daily: FileReport,
    pub lightning_monthly: FileReport,
    pub lightning_yearly: FileReport,
    pub cloud_daily: FileReport,
    pub cloud_monthly: FileReport,
    pub cloud_yearly: FileReport,
}

impl LoadReport {
    fn files(&self) -> [(&'static str, &FileReport); 7] {
        [
            ("stations", &self.stations),
            ("lightning_daily", &self.lightning_daily),
            ("lightning_monthly", &self.lightning_monthly),
            ("lightning_yearly", &self.lightning_yearly),
            ("cloud_daily", &self.cloud_daily),
            ("cloud_monthly", &self.cloud_monthly),
            ("cloud_yearly", &self.cloud_yearly),
        ]
    }

    pub fn total_skipped(&self) -> usize {
        self.files().iter().map(|(_, r)| r.skipped).sum()
    }

    pub fn total_loaded(&self) -> usize {
        self.files().iter().map(|(_, r)| r.loaded).sum()
    }
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .files()
            .iter()
            .map(|(name, r)| format!("{name}: {r}"))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}
