//! Upload parsing: MIME dispatch, size caps, and row extraction.
//!
//! Rows come out as untyped string maps in physical file order; nothing here
//! knows the employee schema. A file that parses but carries the wrong
//! columns flows through to the validator so the caller gets per-row
//! diagnostics instead of an opaque parse failure.

use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};

use crate::domain::{DomainError, ImportRow};

const CSV_MIME_TYPES: &[&str] = &["text/csv", "application/csv"];
const TSV_MIME_TYPES: &[&str] = &["text/tab-separated-values"];
const XLSX_MIME_TYPES: &[&str] = &[
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-excel",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFormat {
    Delimited(u8),
    Spreadsheet,
}

#[derive(Debug, Clone, Copy)]
pub struct ParseLimits {
    pub max_file_bytes: usize,
    pub max_rows: usize,
}

/// Maps a declared content type to an upload format, before any row is read.
pub fn detect_format(content_type: &str) -> Result<UploadFormat, DomainError> {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase();

    if CSV_MIME_TYPES.contains(&mime.as_str()) {
        return Ok(UploadFormat::Delimited(b','));
    }
    if TSV_MIME_TYPES.contains(&mime.as_str()) {
        return Ok(UploadFormat::Delimited(b'\t'));
    }
    if XLSX_MIME_TYPES.contains(&mime.as_str()) {
        return Ok(UploadFormat::Spreadsheet);
    }

    Err(DomainError::UnsupportedFormat(mime))
}

/// Parses an upload into data rows in physical file order.
///
/// The first row names the columns; unknown headers are ignored and missing
/// ones surface later as per-row missing-field errors. Zero data rows is a
/// fatal [`DomainError::EmptyFile`].
pub fn parse_upload(
    bytes: &[u8],
    content_type: &str,
    limits: &ParseLimits,
) -> Result<Vec<ImportRow>, DomainError> {
    let format = detect_format(content_type)?;

    if bytes.len() > limits.max_file_bytes {
        return Err(DomainError::FileTooLarge {
            actual: bytes.len(),
            limit: limits.max_file_bytes,
        });
    }

    let rows = match format {
        UploadFormat::Delimited(delimiter) => parse_delimited(bytes, delimiter)?,
        UploadFormat::Spreadsheet => parse_spreadsheet(bytes)?,
    };

    if rows.is_empty() {
        return Err(DomainError::EmptyFile);
    }
    if rows.len() > limits.max_rows {
        return Err(DomainError::TooManyRows {
            actual: rows.len(),
            limit: limits.max_rows,
        });
    }

    Ok(rows)
}

/// Maps a raw header cell to the logical column name consumed by the
/// validator: trimmed, lowercased, spaces and hyphens as underscores.
pub fn normalize_header(raw: &str) -> String {
    raw.trim().to_lowercase().replace([' ', '-'], "_")
}

fn parse_delimited(bytes: &[u8], delimiter: u8) -> Result<Vec<ImportRow>, DomainError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|err| DomainError::CorruptFile(err.to_string()))?
        .iter()
        .map(normalize_header)
        .collect();

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|err| DomainError::CorruptFile(err.to_string()))?;

        let mut row = ImportRow::new(index as u32 + 2);
        for (header, value) in headers.iter().zip(record.iter()) {
            if header.is_empty() || value.is_empty() {
                continue;
            }
            row.fields.insert(header.clone(), value.to_string());
        }

        if row.fields.is_empty() {
            continue;
        }
        rows.push(row);
    }

    Ok(rows)
}

fn parse_spreadsheet(bytes: &[u8]) -> Result<Vec<ImportRow>, DomainError> {
    let mut workbook =
        Xlsx::new(Cursor::new(bytes)).map_err(|err| DomainError::CorruptFile(err.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(DomainError::EmptyFile)?
        .map_err(|err| DomainError::CorruptFile(err.to_string()))?;

    let mut sheet_rows = range.rows();
    let Some(header_row) = sheet_rows.next() else {
        return Ok(Vec::new());
    };
    let headers: Vec<String> = header_row
        .iter()
        .map(|cell| normalize_header(&cell_text(cell).unwrap_or_default()))
        .collect();

    let mut rows = Vec::new();
    for (index, cells) in sheet_rows.enumerate() {
        let mut row = ImportRow::new(index as u32 + 2);
        for (header, cell) in headers.iter().zip(cells.iter()) {
            if header.is_empty() {
                continue;
            }
            let Some(value) = cell_text(cell) else {
                continue;
            };
            row.fields.insert(header.clone(), value);
        }

        if row.fields.is_empty() {
            continue;
        }
        rows.push(row);
    }

    Ok(rows)
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        // whole numbers render without the trailing ".0" Excel stores
        Data::Float(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
            Some(format!("{}", *value as i64))
        }
        Data::Float(value) => Some(value.to_string()),
        Data::Int(value) => Some(value.to_string()),
        Data::Bool(value) => Some(value.to_string()),
        Data::DateTime(value) => value.as_datetime().map(|dt| dt.date().to_string()),
        Data::DateTimeIso(value) => Some(value.chars().take(10).collect()),
        Data::DurationIso(_) | Data::Error(_) => None,
    }
}
