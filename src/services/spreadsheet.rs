//! Spreadsheet decoding.
//!
//! Turns the first sheet of a workbook into row objects keyed by the header
//! row. Every non-empty cell is rendered as text; empty cells become `null`
//! and keep their key.

use std::collections::HashSet;
use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};

/// Content type of `.xlsx` workbooks, also used for every download.
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Content type of legacy `.xls` workbooks.
pub const XLS_CONTENT_TYPE: &str = "application/vnd.ms-excel";

/// Content types accepted for upload.
pub const ALLOWED_CONTENT_TYPES: &[&str] = &[XLSX_CONTENT_TYPE, XLS_CONTENT_TYPE];

/// Name given to header cells that are empty.
const EMPTY_HEADER: &str = "__EMPTY";

/// One data row: header name -> cell text or null.
pub type RowObject = Map<String, Value>;

/// Check whether an upload's declared content type is a supported workbook.
pub fn is_spreadsheet_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    ALLOWED_CONTENT_TYPES.contains(&essence.as_str())
}

/// Decode a workbook and convert its first sheet into row objects.
///
/// The format (xlsx, xlsm, xlsb, xls, ods) is detected from the bytes. The
/// first row of the used range is the header; rows whose cells are all empty
/// are skipped. A sheet with only a header yields an empty vector.
pub fn parse_first_sheet(bytes: &[u8]) -> AppResult<Vec<RowObject>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::Spreadsheet("Workbook contains no sheets".to_string()))??;

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(header_row) => header_names(header_row),
        None => return Ok(Vec::new()),
    };

    let objects = rows
        .filter_map(|row| {
            let values: Vec<Option<String>> = row.iter().map(cell_text).collect();
            if values.iter().all(Option::is_none) {
                return None;
            }

            let object = headers
                .iter()
                .zip(values)
                .map(|(header, value)| (header.clone(), value.map_or(Value::Null, Value::String)))
                .collect::<RowObject>();
            Some(object)
        })
        .collect();

    Ok(objects)
}

/// Resolve header names, naming blanks and de-duplicating repeats.
fn header_names(row: &[Data]) -> Vec<String> {
    let mut used = HashSet::with_capacity(row.len());

    row.iter()
        .map(|cell| {
            let base = cell_text(cell).unwrap_or_else(|| EMPTY_HEADER.to_string());
            let mut name = base.clone();
            let mut suffix = 0;
            while !used.insert(name.clone()) {
                suffix += 1;
                name = format!("{}_{}", base, suffix);
            }
            name
        })
        .collect()
}

/// Text form of a cell, or `None` for an empty cell.
fn cell_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty => return None,
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => format_number(*f),
        Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Data::DateTime(dt) if dt.is_datetime() => match dt.as_datetime() {
            Some(value) if value.time() == chrono::NaiveTime::MIN => {
                value.format("%Y-%m-%d").to_string()
            }
            Some(value) => value.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => format_number(dt.as_f64()),
        },
        Data::DateTime(dt) => format_number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => e.to_string(),
    };
    Some(text)
}

/// Render a number the way a spreadsheet shows it in general format.
fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
