//! In-memory view of an uploaded tabular file.
//!
//! The pipeline consumes a header row plus zero or more data rows; cells may
//! be text, numbers, booleans, or empty. The whole upload is materialized in
//! memory for the duration of one batch run.

use crate::error::PipelineError;
use std::io::Cursor;
use std::path::Path;
use umya_spreadsheet::Worksheet;
use umya_spreadsheet::reader::xlsx;

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Empty,
}

impl CellValue {
    pub fn from_raw(raw: &str) -> Self {
        if raw.is_empty() {
            return CellValue::Empty;
        }
        if let Ok(number) = raw.parse::<f64>() {
            return CellValue::Number(number);
        }
        let lower = raw.to_ascii_lowercase();
        if lower == "true" {
            return CellValue::Bool(true);
        }
        if lower == "false" {
            return CellValue::Bool(false);
        }
        CellValue::Text(raw.to_string())
    }

    /// Display text of the cell, `None` when blank. Numeric cells render
    /// back verbatim (integers without a trailing `.0`).
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            CellValue::Number(number) => {
                if number.fract() == 0.0 && number.abs() < 1e15 {
                    Some(format!("{}", *number as i64))
                } else {
                    Some(format!("{number}"))
                }
            }
            CellValue::Bool(flag) => Some(flag.to_string()),
        }
    }
}

/// One uploaded table: header row plus data rows, in upload order.
#[derive(Debug, Clone)]
pub struct UploadedTable {
    headers: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl UploadedTable {
    /// Build directly from values, for hosts that already hold tabular data.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self { headers, rows }
    }

    pub fn from_xlsx_path(path: &Path) -> Result<Self, PipelineError> {
        let book = xlsx::read(path)
            .map_err(|err| PipelineError::TableRead(format!("{}: {err}", path.display())))?;
        let sheet = book
            .get_sheet_collection()
            .first()
            .ok_or_else(|| PipelineError::TableRead("workbook has no sheets".to_string()))?;
        Self::from_sheet(sheet)
    }

    pub fn from_xlsx_bytes(bytes: &[u8]) -> Result<Self, PipelineError> {
        let book = xlsx::read_reader(Cursor::new(bytes), true)
            .map_err(|err| PipelineError::TableRead(err.to_string()))?;
        let sheet = book
            .get_sheet_collection()
            .first()
            .ok_or_else(|| PipelineError::TableRead("workbook has no sheets".to_string()))?;
        Self::from_sheet(sheet)
    }

    fn from_sheet(sheet: &Worksheet) -> Result<Self, PipelineError> {
        let (max_col, max_row) = sheet.get_highest_column_and_row();
        if max_row == 0 || max_col == 0 {
            return Err(PipelineError::TableRead(
                "uploaded sheet has no header row".to_string(),
            ));
        }

        let headers: Vec<String> = (1..=max_col)
            .map(|col| sheet.get_value((col, 1)).trim().to_string())
            .collect();

        let mut rows = Vec::with_capacity(max_row.saturating_sub(1) as usize);
        for row in 2..=max_row {
            let cells: Vec<CellValue> = (1..=max_col)
                .map(|col| CellValue::from_raw(&sheet.get_value((col, row))))
                .collect();
            rows.push(cells);
        }

        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}
