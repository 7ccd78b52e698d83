//! CSV file sink for the fuel log.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use tracing::debug;

use fuelog_core::models::config::LogConfig;
use fuelog_core::models::row::{COLUMNS, ODOMETER_COLUMN};
use fuelog_core::{RowSink, SheetRow, SinkError};

/// Appends rows to a CSV file and reads the odometer history back from it.
pub struct CsvSink {
    path: PathBuf,
    write_header: bool,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_header: true,
        }
    }

    pub fn from_config(config: &LogConfig) -> Self {
        Self::new(config.path.clone()).with_header(config.write_header)
    }

    /// Write the column header when the file is created.
    pub fn with_header(mut self, write_header: bool) -> Self {
        self.write_header = write_header;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_new(&self) -> bool {
        fs::metadata(&self.path).map(|m| m.len() == 0).unwrap_or(true)
    }
}

impl RowSink for CsvSink {
    fn last_odometer(&self) -> fuelog_core::Result<Option<u64>> {
        if self.is_new() {
            return Ok(None);
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(self.write_header)
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| SinkError::History(e.to_string()))?;

        let mut last = None;
        for record in reader.records() {
            let record = record.map_err(|e| SinkError::History(e.to_string()))?;
            if record.len() != COLUMNS.len() {
                return Err(SinkError::ColumnMismatch {
                    expected: COLUMNS.len(),
                    found: record.len(),
                }
                .into());
            }
            if let Some(odometer) = record
                .get(ODOMETER_COLUMN)
                .and_then(|cell| cell.trim().parse::<u64>().ok())
            {
                last = Some(odometer);
            }
        }

        debug!("Last logged odometer in {}: {:?}", self.path.display(), last);
        Ok(last)
    }

    fn append(&mut self, row: &SheetRow) -> fuelog_core::Result<()> {
        let is_new = self.is_new();

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| SinkError::Open(format!("{}: {}", self.path.display(), e)))?;

        let mut writer = csv::Writer::from_writer(file);
        if is_new && self.write_header {
            writer
                .write_record(COLUMNS)
                .map_err(|e| SinkError::Append(e.to_string()))?;
        }
        writer
            .write_record(row.to_record())
            .map_err(|e| SinkError::Append(e.to_string()))?;
        writer.flush()?;

        Ok(())
    }
}
