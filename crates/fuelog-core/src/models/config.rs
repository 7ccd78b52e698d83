//! Configuration structures for the fuel logging pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::FuelogError;

/// Largest number of decimal places a `Decimal` can carry.
pub const MAX_MPG_PRECISION: u32 = 28;

/// Main configuration for fuelog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuelogConfig {
    /// Receipt extraction configuration.
    pub extraction: ExtractionConfig,

    /// Mileage calculation configuration.
    pub mileage: MileageConfig,

    /// Log sink configuration.
    pub log: LogConfig,
}

/// Preferred order for ambiguous numeric dates such as `04/05/2024`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateOrder {
    /// `MM/DD/YYYY` first, `DD/MM/YYYY` when the month is out of range.
    #[default]
    MonthFirst,
    /// `DD/MM/YYYY` first, `MM/DD/YYYY` when the month is out of range.
    DayFirst,
}

/// Receipt extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Preferred order for ambiguous numeric dates.
    pub date_order: DateOrder,

    /// Minimum confidence to accept an extracted field.
    pub min_field_confidence: f32,

    /// Accept matches that are not anchored by a field keyword.
    pub allow_unlabeled: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            date_order: DateOrder::MonthFirst,
            min_field_confidence: 0.5,
            allow_unlabeled: true,
        }
    }
}

/// Mileage calculation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MileageConfig {
    /// Decimal places kept for miles per gallon.
    pub mpg_precision: u32,
}

impl Default for MileageConfig {
    fn default() -> Self {
        Self { mpg_precision: 2 }
    }
}

/// Log sink configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// CSV file rows are appended to.
    pub path: PathBuf,

    /// Write the column header when creating a new log file.
    pub write_header: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("fuel-log.csv"),
            write_header: true,
        }
    }
}

impl FuelogConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Check that values are within the ranges the pipeline supports.
    pub fn validate(&self) -> crate::error::Result<()> {
        let confidence = self.extraction.min_field_confidence;
        if !(0.0..=1.0).contains(&confidence) {
            return Err(FuelogError::Config(format!(
                "extraction.min_field_confidence must be between 0 and 1, got {}",
                confidence
            )));
        }
        if self.mileage.mpg_precision > MAX_MPG_PRECISION {
            return Err(FuelogError::Config(format!(
                "mileage.mpg_precision must be at most {}, got {}",
                MAX_MPG_PRECISION, self.mileage.mpg_precision
            )));
        }
        if self.log.path.as_os_str().is_empty() {
            return Err(FuelogError::Config("log.path must not be empty".to_string()));
        }
        Ok(())
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
