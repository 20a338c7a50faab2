/// Core data types for the CSV converters.
///
/// This module defines the shared domain model imported by all other modules:
/// the output row types for both converters, the measurements of the
/// climate-division dataset, and the error taxonomy. No I/O happens here.

use rust_decimal::Decimal;
use std::collections::HashMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Measurements
// ---------------------------------------------------------------------------

/// Which statistic a climate-division line reports.
///
/// Each measurement maps to exactly one output column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measurement {
    AvgTemp,
    MaxTemp,
    MinTemp,
}

impl Measurement {
    /// Output column name for this measurement.
    pub fn column(&self) -> &'static str {
        match self {
            Measurement::AvgTemp => "avg_temp",
            Measurement::MaxTemp => "max_temp",
            Measurement::MinTemp => "min_temp",
        }
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

// ---------------------------------------------------------------------------
// Climate division rows
// ---------------------------------------------------------------------------

/// One decoded (station line, month) pair from a climate-division file.
///
/// Exactly one measurement column is populated per row; rows for the same
/// state/division/month carrying different codes stay separate.
#[derive(Debug, Clone, PartialEq)]
pub struct ClimateRow {
    /// Full state name resolved from the 2-digit state code.
    pub state: String,
    pub division: String,
    /// Measurement code as it appeared in the key, e.g. "27".
    pub raw_code: String,
    /// Year as it appeared in the key, e.g. "0001" or "1987".
    pub raw_year: String,
    /// `{normalized_year}-{month:02}-01`
    pub date: String,
    pub measurement: Measurement,
    pub value: Decimal,
}

impl ClimateRow {
    /// Value for a measurement column, `None` unless this row carries it.
    pub fn measurement_value(&self, column: Measurement) -> Option<Decimal> {
        if self.measurement == column {
            Some(self.value)
        } else {
            None
        }
    }

    pub fn avg_temp(&self) -> Option<Decimal> {
        self.measurement_value(Measurement::AvgTemp)
    }

    pub fn max_temp(&self) -> Option<Decimal> {
        self.measurement_value(Measurement::MaxTemp)
    }

    pub fn min_temp(&self) -> Option<Decimal> {
        self.measurement_value(Measurement::MinTemp)
    }
}

// ---------------------------------------------------------------------------
// Groundhog rows
// ---------------------------------------------------------------------------

/// A groundhog's scalar fields merged with one of its predictions.
///
/// Values are already rendered to CSV text, keyed by column name. The
/// column order lives in the schema that produced the row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FlatPredictionRow {
    values: HashMap<String, String>,
}

impl FlatPredictionRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field, replacing any earlier value under the same name.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.values.insert(column.into(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }

    /// Field values laid out in `columns` order; missing fields are empty.
    pub fn to_record(&self, columns: &[String]) -> Vec<String> {
        columns
            .iter()
            .map(|c| self.get(c).unwrap_or_default().to_string())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that abort a conversion run.
///
/// None of these are recovered locally; a failure means the source data
/// changed shape and the lookup tables or field contract need revisiting.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// The input document does not have the expected structure.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// A record's field set differs from the declared column contract.
    #[error("Schema mismatch in record {record}: {detail}")]
    SchemaMismatch { record: usize, detail: String },

    /// A 2-digit code is absent from a lookup table.
    #[error("Unknown {table} code: {code:?}")]
    UnknownCode { table: &'static str, code: String },

    /// A line that does not tokenize into the expected shape.
    #[error("Format error on line {line}: {message}")]
    Format { line: usize, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn row(measurement: Measurement) -> ClimateRow {
        ClimateRow {
            state: "Alabama".to_string(),
            division: "01".to_string(),
            raw_code: "27".to_string(),
            raw_year: "0001".to_string(),
            date: "2001-01-01".to_string(),
            measurement,
            value: Decimal::from_str("51.90").unwrap(),
        }
    }

    #[test]
    fn test_only_own_measurement_is_populated() {
        let r = row(Measurement::MaxTemp);
        assert_eq!(r.max_temp().map(|v| v.to_string()), Some("51.90".to_string()));
        assert!(r.avg_temp().is_none());
        assert!(r.min_temp().is_none());
    }

    #[test]
    fn test_measurement_columns() {
        assert_eq!(Measurement::AvgTemp.column(), "avg_temp");
        assert_eq!(Measurement::MaxTemp.column(), "max_temp");
        assert_eq!(Measurement::MinTemp.to_string(), "min_temp");
    }

    #[test]
    fn test_flat_row_record_follows_column_order() {
        let mut r = FlatPredictionRow::new();
        r.set("name", "Punxsutawney Phil");
        r.set("shadow", "true");
        r.set("name", "Phil");

        let columns = vec!["shadow".to_string(), "name".to_string(), "missing".to_string()];
        assert_eq!(r.to_record(&columns), vec!["true", "Phil", ""]);
    }

    #[test]
    fn test_error_messages_name_the_code() {
        let err = ConvertError::UnknownCode { table: "state", code: "99".to_string() };
        assert_eq!(err.to_string(), "Unknown state code: \"99\"");

        let err = ConvertError::Format { line: 3, message: "expected 13 tokens, found 12".to_string() };
        assert!(err.to_string().contains("line 3"));
    }
}
