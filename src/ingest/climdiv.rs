/// NOAA nClimDiv Fixed-Width Parser
///
/// Parses per-division monthly temperature files from the NCEI climate
/// division archive.
/// Format: one line per (state, division, element, year), whitespace-aligned
/// Source: https://www.ncei.noaa.gov/pub/data/cirs/climdiv/divisional-readme.txt
///
/// Line structure:
///   SSDDEEYYYY  v1  v2 ... v12
///   - SS   state code (01-48 contiguous US, 50 Alaska)
///   - DD   division within the state
///   - EE   element code: 02 avg temp, 27 max temp, 28 min temp
///   - YYYY year; "00xx" means 20xx
///   - v1..v12 January..December values, e.g. "51.90"
///
/// Each line becomes 12 rows, one per month. Rows from every line are then
/// sorted by (date, state name); the sort is stable so rows sharing a date
/// and state keep their input order.

use rust_decimal::Decimal;
use std::fs;
use std::str::FromStr;

use crate::codes::CodeTables;
use crate::config::{ClimdivConfig, ColumnSet};
use crate::export;
use crate::model::{ClimateRow, ConvertError, Measurement};

pub const MONTHS: usize = 12;

/// Key token plus one value per month.
pub const TOKENS_PER_LINE: usize = MONTHS + 1;

/// Length of the SSDDEEYYYY key.
pub const KEY_LEN: usize = 10;

/// Header of the published climate CSV.
pub const PUBLISHED_HEADER: &[&str] = &["date", "state", "max_temp", "division", "raw_code", "raw_year"];

/// Header with every measurement column.
pub const ALL_MEASUREMENTS_HEADER: &[&str] = &[
    "date", "state", "avg_temp", "max_temp", "min_temp", "division", "raw_code", "raw_year",
];

// ---------------------------------------------------------------------------
// Key decoding
// ---------------------------------------------------------------------------

/// The four positional fields of a line key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClimateKey<'a> {
    pub state_code: &'a str,
    pub division: &'a str,
    pub raw_code: &'a str,
    pub raw_year: &'a str,
}

/// Splits a 10-character key into state, division, element code and year.
pub fn decode_key(key: &str, line_no: usize) -> Result<ClimateKey<'_>, ConvertError> {
    if key.len() != KEY_LEN || !key.is_ascii() {
        return Err(ConvertError::Format {
            line: line_no,
            message: format!("key {:?} is not {} ASCII characters", key, KEY_LEN),
        });
    }

    Ok(ClimateKey {
        state_code: &key[0..2],
        division: &key[2..4],
        raw_code: &key[4..6],
        raw_year: &key[6..10],
    })
}

/// Expands the archive's `00xx` year encoding to `20xx`; any other year is
/// returned unchanged.
///
/// Only the `00` prefix is rewritten, so this cannot tell 19xx apart from
/// any other century.
pub fn normalize_year(raw_year: &str) -> String {
    match raw_year.strip_prefix("00") {
        Some(rest) => format!("20{}", rest),
        None => raw_year.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Line parsing
// ---------------------------------------------------------------------------

/// Decodes one line into its 12 monthly rows, January first.
///
/// `line_no` is 1-based and only used in error messages.
pub fn parse_line(
    line: &str,
    line_no: usize,
    tables: &CodeTables,
) -> Result<Vec<ClimateRow>, ConvertError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != TOKENS_PER_LINE {
        return Err(ConvertError::Format {
            line: line_no,
            message: format!(
                "expected {} whitespace-separated tokens, found {}",
                TOKENS_PER_LINE,
                tokens.len()
            ),
        });
    }

    let key = decode_key(tokens[0], line_no)?;
    let state = tables.state_name(key.state_code)?;
    let year = normalize_year(key.raw_year);
    let measurement = tables.measurement(key.raw_code)?;

    tokens[1..]
        .iter()
        .enumerate()
        .map(|(idx, token)| -> Result<ClimateRow, ConvertError> {
            let month = idx + 1;
            let value = Decimal::from_str(token).map_err(|e| ConvertError::Format {
                line: line_no,
                message: format!("month {} value {:?} is not a decimal: {}", month, token, e),
            })?;

            Ok(ClimateRow {
                state: state.to_string(),
                division: key.division.to_string(),
                raw_code: key.raw_code.to_string(),
                raw_year: key.raw_year.to_string(),
                date: format!("{}-{:02}-01", year, month),
                measurement,
                value,
            })
        })
        .collect()
}

/// Sorts rows by (date, state name), stable for ties.
pub fn sort_rows(rows: &mut [ClimateRow]) {
    rows.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.state.cmp(&b.state)));
}

/// Parses every line and returns all rows in output order.
///
/// A blank line is not a data line and fails like any other short line.
pub fn parse_climdiv(text: &str, tables: &CodeTables) -> Result<Vec<ClimateRow>, ConvertError> {
    let mut rows = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        rows.extend(parse_line(line, idx + 1, tables)?);
    }

    sort_rows(&mut rows);
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Output layout
// ---------------------------------------------------------------------------

/// CSV header for a column set.
pub fn header(columns: ColumnSet) -> &'static [&'static str] {
    match columns {
        ColumnSet::Published => PUBLISHED_HEADER,
        ColumnSet::AllMeasurements => ALL_MEASUREMENTS_HEADER,
    }
}

fn measurement_text(row: &ClimateRow, column: Measurement) -> String {
    row.measurement_value(column)
        .map(|v| v.to_string())
        .unwrap_or_default()
}

/// A row's fields in `header(columns)` order. Measurement columns the row
/// does not carry are empty.
pub fn to_record(row: &ClimateRow, columns: ColumnSet) -> Vec<String> {
    match columns {
        ColumnSet::Published => vec![
            row.date.clone(),
            row.state.clone(),
            measurement_text(row, Measurement::MaxTemp),
            row.division.clone(),
            row.raw_code.clone(),
            row.raw_year.clone(),
        ],
        ColumnSet::AllMeasurements => vec![
            row.date.clone(),
            row.state.clone(),
            measurement_text(row, Measurement::AvgTemp),
            measurement_text(row, Measurement::MaxTemp),
            measurement_text(row, Measurement::MinTemp),
            row.division.clone(),
            row.raw_code.clone(),
            row.raw_year.clone(),
        ],
    }
}

/// Number of rows whose value has no column under `columns`.
pub fn dropped_value_count(rows: &[ClimateRow], columns: ColumnSet) -> usize {
    match columns {
        ColumnSet::Published => rows
            .iter()
            .filter(|r| r.measurement != Measurement::MaxTemp)
            .count(),
        ColumnSet::AllMeasurements => 0,
    }
}

/// Reads the configured climate-division file and writes the sorted CSV.
/// Returns the number of rows written.
pub fn convert(config: &ClimdivConfig, tables: &CodeTables) -> Result<usize, ConvertError> {
    let text = fs::read_to_string(&config.input)?;
    let rows = parse_climdiv(&text, tables)?;
    tracing::info!(
        "Decoded {} monthly rows from {}",
        rows.len(),
        config.input.display()
    );

    let dropped = dropped_value_count(&rows, config.columns);
    if dropped > 0 {
        tracing::warn!(
            "{} avg_temp/min_temp values have no column in the published header and are left out",
            dropped
        );
    }

    export::write_csv(
        &config.output,
        header(config.columns),
        rows.iter().map(|row| to_record(row, config.columns)),
    )
}
