// ==============================================================================
// dataset.rs - SNP Association Dataset Loader
// ==============================================================================
// Description: Loads the tabular SNP association dataset into memory
// Author: Matt Barham
// Created: 2025-11-12
// Modified: 2026-01-17
// Version: 2.0.0
// ==============================================================================
// Format: CSV/TSV or spreadsheet (first worksheet) with a header row
// Example:
//   Chromosome,Positionb,EAFc,Overall Breast Cancerd,ER-positivee,ER-negativef
//   10,123337335,0.38,1.23,1,0
//   1,100000,0.2,NA,1,0        <- dropped (missing required value)
// ==============================================================================

use calamine::{open_workbook_auto, DataType, Reader};
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::SampleRecord;
use crate::validator::{FileValidator, ValidationError};

/// Textual markers treated as missing values
const NULL_MARKERS: [&str; 6] = ["na", "n/a", "nan", "null", "none", "-"];

/// Upper bound on base positions; the longest human chromosome is ~249 Mb
const MAX_BASE_POSITION: f64 = 1_000_000_000.0;

/// Header names of the required columns.
///
/// Defaults match the column names the risk model was trained on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMap {
    pub chromosome: String,
    pub position: String,
    pub allele_frequency: String,
    pub observed_outcome: String,
    pub er_positive: String,
    pub er_negative: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            chromosome: "Chromosome".to_string(),
            position: "Positionb".to_string(),
            allele_frequency: "EAFc".to_string(),
            observed_outcome: "Overall Breast Cancerd".to_string(),
            er_positive: "ER-positivee".to_string(),
            er_negative: "ER-negativef".to_string(),
        }
    }
}

impl ColumnMap {
    fn required(&self) -> [&str; 6] {
        [
            &self.chromosome,
            &self.position,
            &self.allele_frequency,
            &self.observed_outcome,
            &self.er_positive,
            &self.er_negative,
        ]
    }
}

/// Errors that can occur while loading the dataset
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Invalid dataset file: {0}")]
    Validation(#[from] ValidationError),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("Workbook contains no worksheets")]
    NoWorksheet,

    #[error("Unsupported dataset format: .{0}")]
    UnsupportedFormat(String),

    #[error("Required column missing: {0}")]
    MissingColumn(String),

    #[error("Invalid value in row {row}, column '{column}': {value}")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Dataset contains no complete rows")]
    Empty,
}

/// Rejected sample selection
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectionError {
    #[error("Sample index {index} is out of range for {len} samples")]
    OutOfRange { index: usize, len: usize },
}

/// Source cell before numeric conversion
#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Number(f64),
    Text(String),
    Empty,
}

/// In-memory, read-only association dataset
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<SampleRecord>,
    dropped_rows: usize,
    source: Option<PathBuf>,
}

impl Dataset {
    /// Build a dataset from already-parsed records
    pub fn from_records(records: Vec<SampleRecord>) -> Self {
        Self {
            records,
            dropped_rows: 0,
            source: None,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Highest selectable index, `None` for an empty dataset
    pub fn last_index(&self) -> Option<usize> {
        self.records.len().checked_sub(1)
    }

    pub fn get(&self, index: usize) -> Option<&SampleRecord> {
        self.records.get(index)
    }

    /// Select a sample by zero-based index, rejecting anything outside `[0, len-1]`
    pub fn select(&self, index: usize) -> Result<&SampleRecord, SelectionError> {
        self.records.get(index).ok_or(SelectionError::OutOfRange {
            index,
            len: self.records.len(),
        })
    }

    pub fn records(&self) -> &[SampleRecord] {
        &self.records
    }

    /// Rows discarded for missing required values
    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

/// Dataset loader for delimited text and spreadsheet sources
pub struct DatasetLoader;

impl DatasetLoader {
    /// Load a dataset, dropping rows with missing required values
    ///
    /// # Arguments
    /// * `path` - Path to a `.csv`, `.tsv`, `.txt`, `.xlsx`, `.xlsm`, `.xls` or `.ods` file
    /// * `columns` - Header names of the required columns
    ///
    /// # Returns
    /// * `Ok(Dataset)` - At least one complete row
    /// * `Err(DatasetError)` - Missing/malformed file, missing column, bad value, or no rows
    pub fn load(path: impl AsRef<Path>, columns: &ColumnMap) -> Result<Dataset, DatasetError> {
        let path = path.as_ref();
        let validated = FileValidator::for_dataset().validate(path)?;

        info!(
            path = %path.display(),
            size = validated.size,
            sha256 = %validated.hash_sha256,
            "Loading SNP dataset"
        );

        let (headers, rows) = match validated.extension.as_str() {
            "csv" => Self::read_delimited(path, b',')?,
            "tsv" | "txt" => Self::read_delimited(path, b'\t')?,
            "xlsx" | "xlsm" | "xls" | "ods" => Self::read_spreadsheet(path)?,
            other => return Err(DatasetError::UnsupportedFormat(other.to_string())),
        };

        let mut dataset = Self::build(&headers, rows, columns)?;
        dataset.source = Some(path.to_path_buf());

        info!(
            samples = dataset.len(),
            dropped = dataset.dropped_rows(),
            "Loaded SNP dataset"
        );

        Ok(dataset)
    }

    fn read_delimited(path: &Path, delimiter: u8) -> Result<(Vec<String>, Vec<Vec<Cell>>), DatasetError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(delimiter)
            .flexible(true)
            .from_path(path)?;

        let headers = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(
                record
                    .iter()
                    .map(|field| {
                        if field.trim().is_empty() {
                            Cell::Empty
                        } else {
                            Cell::Text(field.to_string())
                        }
                    })
                    .collect(),
            );
        }

        Ok((headers, rows))
    }

    fn read_spreadsheet(path: &Path) -> Result<(Vec<String>, Vec<Vec<Cell>>), DatasetError> {
        let mut workbook = open_workbook_auto(path)?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or(DatasetError::NoWorksheet)??;

        let mut rows_iter = range.rows();
        let headers: Vec<String> = match rows_iter.next() {
            Some(row) => row.iter().map(header_text).collect(),
            None => return Err(DatasetError::Empty),
        };
        debug!("Spreadsheet header = {:?}", headers);

        let rows = rows_iter
            .map(|row| row.iter().map(spreadsheet_cell).collect())
            .collect();

        Ok((headers, rows))
    }

    fn build(headers: &[String], rows: Vec<Vec<Cell>>, columns: &ColumnMap) -> Result<Dataset, DatasetError> {
        // Resolve required column positions once
        let mut indices = [0usize; 6];
        for (slot, name) in indices.iter_mut().zip(columns.required()) {
            *slot = headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))?;
        }

        let names = columns.required();
        let mut records = Vec::with_capacity(rows.len());
        let mut dropped_rows = 0;

        for (offset, row) in rows.iter().enumerate() {
            // Row 1 is the header
            let row_number = offset + 2;

            let mut values = [0.0f64; 6];
            let mut complete = true;
            for (i, &col) in indices.iter().enumerate() {
                let cell = row.get(col).unwrap_or(&Cell::Empty);
                match numeric_value(cell, row_number, names[i])? {
                    Some(v) => values[i] = v,
                    None => {
                        complete = false;
                        break;
                    }
                }
            }

            if !complete {
                dropped_rows += 1;
                continue;
            }

            let [chromosome, position, allele_frequency, observed_outcome, er_positive, er_negative] = values;

            records.push(SampleRecord {
                chromosome: chromosome_number(chromosome, row_number, names[0])?,
                position: base_position(position, row_number, names[1])?,
                allele_frequency,
                er_positive,
                er_negative,
                observed_outcome,
            });
        }

        if dropped_rows > 0 {
            warn!("Dropped {} rows with missing required values", dropped_rows);
        }

        if records.is_empty() {
            return Err(DatasetError::Empty);
        }

        Ok(Dataset {
            records,
            dropped_rows,
            source: None,
        })
    }
}

fn header_text(cell: &DataType) -> String {
    match cell {
        DataType::String(s) | DataType::DateTimeIso(s) | DataType::DurationIso(s) => s.trim().to_string(),
        DataType::Int(i) => i.to_string(),
        DataType::Float(f) | DataType::DateTime(f) | DataType::Duration(f) => f.to_string(),
        DataType::Bool(b) => b.to_string(),
        DataType::Error(_) | DataType::Empty => String::new(),
    }
}

fn spreadsheet_cell(cell: &DataType) -> Cell {
    match cell {
        DataType::Int(i) => Cell::Number(*i as f64),
        DataType::Float(f) | DataType::DateTime(f) | DataType::Duration(f) => Cell::Number(*f),
        DataType::Bool(b) => Cell::Number(if *b { 1.0 } else { 0.0 }),
        DataType::String(s) | DataType::DateTimeIso(s) | DataType::DurationIso(s) => Cell::Text(s.clone()),
        // #N/A and friends read as missing
        DataType::Error(_) | DataType::Empty => Cell::Empty,
    }
}

/// `Ok(None)` for a null cell, error for non-numeric text
fn numeric_value(cell: &Cell, row: usize, column: &str) -> Result<Option<f64>, DatasetError> {
    match cell {
        Cell::Empty => Ok(None),
        Cell::Number(n) if n.is_nan() => Ok(None),
        Cell::Number(n) => Ok(Some(*n)),
        Cell::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() || NULL_MARKERS.contains(&trimmed.to_lowercase().as_str()) {
                return Ok(None);
            }
            trimmed
                .parse::<f64>()
                .map(Some)
                .map_err(|_| DatasetError::InvalidValue {
                    row,
                    column: column.to_string(),
                    value: trimmed.to_string(),
                })
        }
    }
}

fn chromosome_number(value: f64, row: usize, column: &str) -> Result<u8, DatasetError> {
    if value.fract() == 0.0 && value >= 1.0 && value <= u8::MAX as f64 {
        Ok(value as u8)
    } else {
        Err(DatasetError::InvalidValue {
            row,
            column: column.to_string(),
            value: value.to_string(),
        })
    }
}

fn base_position(value: f64, row: usize, column: &str) -> Result<u64, DatasetError> {
    if value.is_finite() && value.fract() == 0.0 && (1.0..=MAX_BASE_POSITION).contains(&value) {
        Ok(value as u64)
    } else {
        Err(DatasetError::InvalidValue {
            row,
            column: column.to_string(),
            value: value.to_string(),
        })
    }
}
