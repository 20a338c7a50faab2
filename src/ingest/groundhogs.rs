/// Groundhog prediction flattener.
///
/// Reads the groundhog-day.com export and denormalizes each groundhog's
/// `predictions` list into one flat row per (groundhog, prediction year).
/// Input shape:
///
/// ```text
/// { "groundhogs": [ { ...scalar fields..., "predictions": [ {"year": 2024, ...}, ... ] }, ... ] }
/// ```
///
/// The CSV columns are derived from the first record: its scalar keys in
/// source order (without `predictions`), then its first prediction's keys,
/// with `year` replaced in place by the configured date column. Every other
/// record is checked against that column contract before anything is
/// written, so a record with extra or missing fields fails the run instead of
/// producing misaligned columns.

use chrono::NaiveDate;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fs;

use crate::config::{DatePolicy, GroundhogConfig};
use crate::export;
use crate::model::{ConvertError, FlatPredictionRow};

/// Top-level key holding the record list.
pub const RECORDS_KEY: &str = "groundhogs";

/// Record key holding the nested prediction list.
pub const PREDICTIONS_KEY: &str = "predictions";

/// Prediction key renamed to the date column.
pub const YEAR_KEY: &str = "year";

/// Month and day of the recurring observation (February 2nd).
const OBSERVATION_MONTH: u32 = 2;
const OBSERVATION_DAY: u32 = 2;

// ---------------------------------------------------------------------------
// Input records
// ---------------------------------------------------------------------------

/// One groundhog: its scalar attributes plus its predictions, both keeping
/// the key order they had in the source document.
#[derive(Debug, Clone, PartialEq)]
pub struct GroundhogRecord {
    pub fields: Map<String, Value>,
    pub predictions: Vec<Map<String, Value>>,
}

/// Name and formatting policy of the column that replaces `year`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateColumn {
    pub name: String,
    pub policy: DatePolicy,
}

impl DateColumn {
    pub fn new(name: impl Into<String>, policy: DatePolicy) -> Self {
        DateColumn {
            name: name.into(),
            policy,
        }
    }
}

impl From<&GroundhogConfig> for DateColumn {
    fn from(config: &GroundhogConfig) -> Self {
        DateColumn::new(config.date_field.clone(), config.date_policy)
    }
}

/// Parses the export document into records.
///
/// Fails with `MalformedInput` if the top level is not an object with a
/// `groundhogs` array, if any record is not an object, or if a record's
/// `predictions` is missing, not a list, empty, or holds a prediction that
/// is not an object with a `year`.
pub fn parse_groundhogs(json: &str) -> Result<Vec<GroundhogRecord>, ConvertError> {
    let document: Value = serde_json::from_str(json)?;

    let top = document.as_object().ok_or_else(|| {
        ConvertError::MalformedInput("top-level JSON value is not an object".to_string())
    })?;

    let records = top
        .get(RECORDS_KEY)
        .ok_or_else(|| ConvertError::MalformedInput(format!("missing `{}` key", RECORDS_KEY)))?
        .as_array()
        .ok_or_else(|| ConvertError::MalformedInput(format!("`{}` is not a list", RECORDS_KEY)))?;

    records
        .iter()
        .enumerate()
        .map(|(idx, value)| parse_record(idx, value))
        .collect()
}

fn parse_record(idx: usize, value: &Value) -> Result<GroundhogRecord, ConvertError> {
    let object = value.as_object().ok_or_else(|| {
        ConvertError::MalformedInput(format!("record {} is not an object", idx))
    })?;

    // Rebuilt rather than removed from, so the remaining keys keep source order
    let fields: Map<String, Value> = object
        .iter()
        .filter(|(key, _)| key.as_str() != PREDICTIONS_KEY)
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    let predictions = match object.get(PREDICTIONS_KEY) {
        Some(Value::Array(list)) => list.clone(),
        Some(_) => {
            return Err(ConvertError::MalformedInput(format!(
                "record {}: `{}` is not a list",
                idx, PREDICTIONS_KEY
            )));
        }
        None => {
            return Err(ConvertError::MalformedInput(format!(
                "record {}: missing `{}`",
                idx, PREDICTIONS_KEY
            )));
        }
    };

    if predictions.is_empty() {
        return Err(ConvertError::MalformedInput(format!(
            "record {}: `{}` is empty",
            idx, PREDICTIONS_KEY
        )));
    }

    let predictions = predictions
        .into_iter()
        .enumerate()
        .map(|(p_idx, p)| match p {
            Value::Object(map) if map.contains_key(YEAR_KEY) => Ok(map),
            Value::Object(_) => Err(ConvertError::MalformedInput(format!(
                "record {}, prediction {}: missing `{}`",
                idx, p_idx, YEAR_KEY
            ))),
            _ => Err(ConvertError::MalformedInput(format!(
                "record {}, prediction {} is not an object",
                idx, p_idx
            ))),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(GroundhogRecord { fields, predictions })
}

// ---------------------------------------------------------------------------
// Column contract
// ---------------------------------------------------------------------------

/// Ordered output columns plus the key sets every record must carry.
#[derive(Debug, Clone, PartialEq)]
pub struct GroundhogSchema {
    columns: Vec<String>,
    scalar_keys: BTreeSet<String>,
    prediction_keys: BTreeSet<String>,
    date: DateColumn,
}

impl GroundhogSchema {
    /// Derives the column contract from a single record.
    ///
    /// A prediction key that repeats a scalar key keeps the scalar's column
    /// position; the prediction's value wins when rows are built.
    pub fn derive(first: &GroundhogRecord, date: DateColumn) -> Result<Self, ConvertError> {
        let first_prediction = first.predictions.first().ok_or_else(|| {
            ConvertError::MalformedInput(format!("record 0: `{}` is empty", PREDICTIONS_KEY))
        })?;

        let mut columns: Vec<String> = first.fields.keys().cloned().collect();
        for key in first_prediction.keys() {
            let column = if key == YEAR_KEY { &date.name } else { key };
            if !columns.iter().any(|c| c == column) {
                columns.push(column.clone());
            }
        }

        Ok(GroundhogSchema {
            columns,
            scalar_keys: first.fields.keys().cloned().collect(),
            prediction_keys: first_prediction.keys().cloned().collect(),
            date,
        })
    }

    /// CSV header, in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Checks that a record and all its predictions carry exactly the
    /// declared keys.
    pub fn validate(&self, idx: usize, record: &GroundhogRecord) -> Result<(), ConvertError> {
        if let Some(detail) = key_set_difference(&self.scalar_keys, record.fields.keys()) {
            return Err(ConvertError::SchemaMismatch {
                record: idx,
                detail: format!("scalar fields {}", detail),
            });
        }

        for (p_idx, prediction) in record.predictions.iter().enumerate() {
            if let Some(detail) = key_set_difference(&self.prediction_keys, prediction.keys()) {
                return Err(ConvertError::SchemaMismatch {
                    record: idx,
                    detail: format!("prediction {} fields {}", p_idx, detail),
                });
            }
        }

        Ok(())
    }

    /// One flat row per prediction, in prediction order.
    pub fn flatten_record(
        &self,
        record: &GroundhogRecord,
    ) -> Result<Vec<FlatPredictionRow>, ConvertError> {
        let mut scalars = FlatPredictionRow::new();
        for (key, value) in &record.fields {
            scalars.set(key.clone(), render_value(value));
        }

        record
            .predictions
            .iter()
            .map(|prediction| -> Result<FlatPredictionRow, ConvertError> {
                let mut row = scalars.clone();
                for (key, value) in prediction {
                    if key == YEAR_KEY {
                        row.set(self.date.name.clone(), observation_date(value, self.date.policy)?);
                    } else {
                        row.set(key.clone(), render_value(value));
                    }
                }
                Ok(row)
            })
            .collect()
    }
}

/// Describes how `found` differs from `expected`, or `None` if equal.
fn key_set_difference<'a>(
    expected: &BTreeSet<String>,
    found: impl Iterator<Item = &'a String>,
) -> Option<String> {
    let found: BTreeSet<&String> = found.collect();
    let missing: Vec<&str> = expected
        .iter()
        .filter(|k| !found.contains(k))
        .map(String::as_str)
        .collect();
    let extra: Vec<&str> = found
        .iter()
        .filter(|k| !expected.contains(k.as_str()))
        .map(|k| k.as_str())
        .collect();

    if missing.is_empty() && extra.is_empty() {
        return None;
    }

    let mut parts = Vec::new();
    if !missing.is_empty() {
        parts.push(format!("missing [{}]", missing.join(", ")));
    }
    if !extra.is_empty() {
        parts.push(format!("unexpected [{}]", extra.join(", ")));
    }
    Some(parts.join("; "))
}

// ---------------------------------------------------------------------------
// Value rendering
// ---------------------------------------------------------------------------

/// CSV text for a JSON value: strings unquoted, null empty, nested values as
/// compact JSON.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Years a `Calendar` date can be written for as `YYYY-MM-DD`.
const CALENDAR_YEARS: std::ops::RangeInclusive<i32> = 1..=9999;

/// Text of a JSON year. Integral floats such as `2024.0` are written as
/// integers.
fn year_text(n: &serde_json::Number) -> String {
    if n.is_f64() {
        if let Some(f) = n.as_f64() {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                return format!("{}", f as i64);
            }
        }
    }
    n.to_string()
}

/// Builds the February 2nd observation date for a prediction year.
///
/// The year may be a JSON integer, an integral float or a string.
/// `Calendar` requires a year in 1..=9999 so the date stays four-digit
/// `YYYY-02-02`; `Literal` pastes the year text in as-is.
pub fn observation_date(year: &Value, policy: DatePolicy) -> Result<String, ConvertError> {
    let text = match year {
        Value::Number(n) => year_text(n),
        Value::String(s) => s.trim().to_string(),
        other => {
            return Err(ConvertError::MalformedInput(format!(
                "`{}` is not a number: {}",
                YEAR_KEY, other
            )));
        }
    };

    match policy {
        DatePolicy::Literal => Ok(format!(
            "{}-{:02}-{:02}",
            text, OBSERVATION_MONTH, OBSERVATION_DAY
        )),
        DatePolicy::Calendar => {
            let y: i32 = text.parse().map_err(|_| {
                ConvertError::MalformedInput(format!("`{}` is not an integer: {}", YEAR_KEY, text))
            })?;
            if !CALENDAR_YEARS.contains(&y) {
                return Err(ConvertError::MalformedInput(format!(
                    "year {} is outside {}..={}",
                    y,
                    CALENDAR_YEARS.start(),
                    CALENDAR_YEARS.end()
                )));
            }
            let date = NaiveDate::from_ymd_opt(y, OBSERVATION_MONTH, OBSERVATION_DAY)
                .ok_or_else(|| {
                    ConvertError::MalformedInput(format!("year {} is out of range", y))
                })?;
            Ok(date.format("%Y-%m-%d").to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Flattening
// ---------------------------------------------------------------------------

/// Flattened output: header columns plus rows in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatTable {
    pub columns: Vec<String>,
    pub rows: Vec<FlatPredictionRow>,
}

impl FlatTable {
    /// Rows laid out in column order, ready for the CSV writer.
    pub fn records(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        self.rows.iter().map(|row| row.to_record(&self.columns))
    }
}

/// Flattens records into one row per (record, prediction), record-major.
///
/// Every record is validated against the schema derived from the first
/// before any row is built.
pub fn flatten(records: &[GroundhogRecord], date: DateColumn) -> Result<FlatTable, ConvertError> {
    let first = records
        .first()
        .ok_or_else(|| ConvertError::MalformedInput(format!("`{}` is empty", RECORDS_KEY)))?;

    let schema = GroundhogSchema::derive(first, date)?;
    for (idx, record) in records.iter().enumerate() {
        schema.validate(idx, record)?;
    }

    let mut rows = Vec::with_capacity(records.iter().map(|r| r.predictions.len()).sum());
    for record in records {
        rows.extend(schema.flatten_record(record)?);
    }

    Ok(FlatTable {
        columns: schema.columns().to_vec(),
        rows,
    })
}

/// Reads the configured JSON export and writes the flattened CSV.
/// Returns the number of rows written.
pub fn convert(config: &GroundhogConfig) -> Result<usize, ConvertError> {
    let json = fs::read_to_string(&config.input)?;
    let records = parse_groundhogs(&json)?;
    tracing::info!(
        "Read {} groundhogs from {}",
        records.len(),
        config.input.display()
    );

    let table = flatten(&records, DateColumn::from(config))?;
    tracing::debug!("Columns: {}", table.columns.join(","));

    export::write_csv(&config.output, table.columns.as_slice(), table.records())
}
