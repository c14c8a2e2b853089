// CSV parsing: raw export text to an ordered sequence of keyed rows.
//
// The `csv` crate handles the quoting rules real-world exports hit (fields
// with embedded commas or newlines); a naive line split would mangle those.
use crate::error::AnalysisError;
use crate::types::RawRow;
use crate::util::fold_key;
use csv::{ReaderBuilder, Trim};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct ParsedCsv {
    /// Trimmed, case-folded header names in file order.
    pub headers: Vec<String>,
    /// One map per data row, keyed by the folded header names.
    pub rows: Vec<RawRow>,
}

/// Parse raw CSV text into header names plus keyed rows.
///
/// The first line is the header; column order never matters downstream.
/// Blank lines and rows whose cells are all empty are skipped. A file with
/// no header fails with `EmptyInput`, a header-only file with `NoDataRows`,
/// and malformed quoting with the underlying `csv::Error`.
pub fn parse_csv(text: &str) -> Result<ParsedCsv, AnalysisError> {
    if text.trim().is_empty() {
        return Err(AnalysisError::EmptyInput);
    }

    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = rdr.headers()?.iter().map(fold_key).collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(AnalysisError::EmptyInput);
    }

    let mut rows: Vec<RawRow> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let mut row: RawRow = HashMap::with_capacity(headers.len());
        for (i, name) in headers.iter().enumerate() {
            if name.is_empty() {
                continue;
            }
            let value = record.get(i).unwrap_or("").trim().to_string();
            row.insert(name.clone(), value);
        }
        // Rows that are nothing but separators carry no data.
        if row.values().all(|v| v.is_empty()) {
            continue;
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(AnalysisError::NoDataRows);
    }

    Ok(ParsedCsv { headers, rows })
}
