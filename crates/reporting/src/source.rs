//! CSV source for player value records.

use std::path::{Path, PathBuf};

use csv::StringRecord;
use playervalue_core::config::InputConfig;
use playervalue_core::{PlayerValueError, PlayerValueResult, Record};
use tracing::{debug, info};

/// A player value CSV with a `user_id`, `player_value` and `month` column
/// (names configurable). Extra columns are ignored.
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
    user_id_column: String,
    value_column: String,
    month_column: String,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let defaults = InputConfig::default();
        Self {
            path: path.into(),
            user_id_column: defaults.user_id_column,
            value_column: defaults.value_column,
            month_column: defaults.month_column,
        }
    }

    pub fn from_config(config: &InputConfig) -> Self {
        Self {
            path: PathBuf::from(&config.path),
            user_id_column: config.user_id_column.clone(),
            value_column: config.value_column.clone(),
            month_column: config.month_column.clone(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record. Fails if the file is missing, a required column is
    /// absent, or a value cell is not a finite number. Month cells are kept
    /// verbatim and validated during aggregation.
    pub fn load(&self) -> PlayerValueResult<Vec<Record>> {
        if !self.path.is_file() {
            return Err(PlayerValueError::MissingInput(
                self.path.display().to_string(),
            ));
        }

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)?;
        let headers = reader.headers()?.clone();

        let user_idx = column_index(&headers, &self.user_id_column)?;
        let value_idx = column_index(&headers, &self.value_column)?;
        let month_idx = column_index(&headers, &self.month_column)?;
        debug!(path = %self.path.display(), columns = headers.len(), "Reading player value CSV");

        let mut records = Vec::new();
        for (row, result) in reader.records().enumerate() {
            let line = result?;
            let user_id = cell(&line, user_idx, &self.user_id_column, row)?;
            let raw_value = cell(&line, value_idx, &self.value_column, row)?;
            let month = cell(&line, month_idx, &self.month_column, row)?;
            let player_value = raw_value
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| {
                    PlayerValueError::invalid_input(
                        &self.value_column,
                        Some(row),
                        format!("not a finite number: {raw_value:?}"),
                    )
                })?;

            records.push(Record {
                user_id: user_id.to_string(),
                player_value,
                month: month.to_string(),
            });
        }

        info!(path = %self.path.display(), records = records.len(), "Loaded player value records");
        Ok(records)
    }
}

/// Write records in the `user_id,player_value,month` layout.
pub fn write_records(path: impl AsRef<Path>, records: &[Record]) -> PlayerValueResult<()> {
    let mut writer = csv::Writer::from_path(path.as_ref())?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    info!(path = %path.as_ref().display(), records = records.len(), "Wrote player value records");
    Ok(())
}

/// Rows shorter than the header have no cell for the trailing columns.
fn cell<'a>(line: &'a StringRecord, idx: usize, column: &str, row: usize) -> PlayerValueResult<&'a str> {
    line.get(idx)
        .ok_or_else(|| PlayerValueError::invalid_input(column, Some(row), "missing cell"))
}

fn column_index(headers: &StringRecord, name: &str) -> PlayerValueResult<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| PlayerValueError::invalid_input(name, None, "required column is missing"))
}
