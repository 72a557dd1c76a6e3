//! Explorer settings.
//!
//! Defaults mirror the dashboard's sliders: top-journal count 10 within
//! `[5, 20]`, ten overview rows. Settings can be read from a JSON file and
//! then overridden from the command line.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cache::DEFAULT_CAPACITY;
use crate::error::{ExplorerError, ExplorerResult};

/// Input file used when none is configured.
pub const DEFAULT_DATA_PATH: &str = "metadata.csv";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Metadata file to load.
    pub data_path: PathBuf,
    /// Initial number of journals in the top-journals table.
    pub top_n: usize,
    pub top_n_min: usize,
    pub top_n_max: usize,
    /// Rows shown in the overview table.
    pub overview_rows: usize,
    /// Datasets kept by the [`DatasetCache`](crate::cache::DatasetCache).
    pub cache_capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            top_n: 10,
            top_n_min: 5,
            top_n_max: 20,
            overview_rows: 10,
            cache_capacity: DEFAULT_CAPACITY,
        }
    }
}

impl Settings {
    /// Read settings from a JSON file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> ExplorerResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ExplorerError::Config(format!("reading {}: {e}", path.display())))?;
        let settings: Settings = serde_json::from_str(&text)
            .map_err(|e| ExplorerError::Config(format!("parsing {}: {e}", path.display())))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check the bounds are coherent and `top_n` lies within them.
    pub fn validate(&self) -> ExplorerResult<()> {
        if self.top_n_min < 1 || self.top_n_min > self.top_n_max {
            return Err(ExplorerError::Config(format!(
                "top_n bounds [{}, {}] are invalid",
                self.top_n_min, self.top_n_max
            )));
        }
        if !(self.top_n_min..=self.top_n_max).contains(&self.top_n) {
            return Err(ExplorerError::Config(format!(
                "top_n {} is outside [{}, {}]",
                self.top_n, self.top_n_min, self.top_n_max
            )));
        }
        if self.cache_capacity == 0 {
            return Err(ExplorerError::Config("cache_capacity must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let s = Settings::default();
        assert!(s.validate().is_ok());
        assert_eq!(s.top_n, 10);
        assert_eq!(s.data_path, PathBuf::from("metadata.csv"));
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"data_path": "papers.tsv", "top_n": 7}}"#).unwrap();
        let s = Settings::from_file(file.path()).unwrap();
        assert_eq!(s.data_path, PathBuf::from("papers.tsv"));
        assert_eq!(s.top_n, 7);
        assert_eq!(s.top_n_max, 20);
    }

    #[test]
    fn unknown_keys_and_bad_values_are_config_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"colour": "red"}}"#).unwrap();
        assert!(matches!(
            Settings::from_file(file.path()),
            Err(ExplorerError::Config(_))
        ));

        let s = Settings {
            top_n: 30,
            ..Settings::default()
        };
        assert!(matches!(s.validate(), Err(ExplorerError::Config(_))));

        let s = Settings {
            cache_capacity: 0,
            ..Settings::default()
        };
        assert!(s.validate().is_err());
    }
}
