/// Integration tests for the groundhog prediction flattener
///
/// These tests verify:
/// 1. JSON export → flatten → CSV on disk
/// 2. Header derivation and the explicit column contract
/// 3. Both date policies (calendar `early_spring`, literal `the_day`)
///
/// Run with: cargo test --test groundhogs_integration

use climdiv_tocsv::config::{DatePolicy, GroundhogConfig};
use climdiv_tocsv::ingest::groundhogs;
use climdiv_tocsv::model::ConvertError;

use std::fs;
use std::path::Path;

// Trimmed groundhog-day.com export: three groundhogs, five predictions
const EXPORT_JSON: &str = r#"{
  "groundhogs": [
    {
      "id": 1,
      "slug": "punxsutawney-phil",
      "shortname": "Phil",
      "name": "Punxsutawney Phil",
      "city": "Punxsutawney",
      "region": "Pennsylvania",
      "country": "USA",
      "isGroundhog": true,
      "predictions": [
        { "year": 2022, "shadow": true, "details": "" },
        { "year": 2023, "shadow": true, "details": "" },
        { "year": 2024, "shadow": false, "details": "Early spring, says Phil" }
      ]
    },
    {
      "id": 2,
      "slug": "wiarton-willie",
      "shortname": "Willie",
      "name": "Wiarton Willie",
      "city": "Wiarton",
      "region": "Ontario",
      "country": "Canada",
      "isGroundhog": true,
      "predictions": [
        { "year": 2024, "shadow": false, "details": "" }
      ]
    },
    {
      "id": 3,
      "slug": "lucy-the-lobster",
      "shortname": "Lucy",
      "name": "Lucy the Lobster",
      "city": "Barrington Passage",
      "region": "Nova Scotia",
      "country": "Canada",
      "isGroundhog": false,
      "predictions": [
        { "year": 2024, "shadow": null, "details": "Did not emerge" }
      ]
    }
  ]
}"#;

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

fn config_for(dir: &Path, json: &str, date_field: &str, date_policy: DatePolicy) -> GroundhogConfig {
    let input = dir.join("groundhogs.json");
    fs::write(&input, json).unwrap();

    GroundhogConfig {
        input,
        output: dir.join("gen").join("groundhogs.csv"),
        date_field: date_field.to_string(),
        date_policy,
    }
}

fn read_csv(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).expect("output CSV should exist");
    let header = reader.headers().unwrap().iter().map(String::from).collect();
    let rows = reader
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect();
    (header, rows)
}

// ---------------------------------------------------------------------------
// End-to-end conversion
// ---------------------------------------------------------------------------

#[test]
fn test_flatten_export_to_csv() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path(), EXPORT_JSON, "early_spring", DatePolicy::Calendar);

    let written = groundhogs::convert(&config).unwrap();
    assert_eq!(written, 5, "one row per prediction");

    let (header, rows) = read_csv(&config.output);
    assert_eq!(
        header,
        vec!["id", "slug", "shortname", "name", "city", "region", "country", "isGroundhog",
             "early_spring", "shadow", "details"]
    );
    assert_eq!(rows.len(), 5);

    // Record-major, prediction-minor, input order preserved
    let order: Vec<(&str, &str)> = rows.iter().map(|r| (r[1].as_str(), r[8].as_str())).collect();
    assert_eq!(
        order,
        vec![
            ("punxsutawney-phil", "2022-02-02"),
            ("punxsutawney-phil", "2023-02-02"),
            ("punxsutawney-phil", "2024-02-02"),
            ("wiarton-willie", "2024-02-02"),
            ("lucy-the-lobster", "2024-02-02"),
        ]
    );

    assert_eq!(rows[2][10], "Early spring, says Phil");
    assert_eq!(rows[4][7], "false");
    assert_eq!(rows[4][9], "", "null shadow is written empty");
}

#[test]
fn test_literal_the_day_layout() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path(), EXPORT_JSON, "the_day", DatePolicy::Literal);

    groundhogs::convert(&config).unwrap();
    let (header, rows) = read_csv(&config.output);

    let idx = header.iter().position(|h| h == "the_day").expect("the_day column");
    assert_eq!(idx, 8, "date column takes the place of year");
    assert!(!header.contains(&"year".to_string()));
    assert!(rows.iter().all(|r| r[idx].ends_with("-02-02")));
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[test]
fn test_record_with_extra_field_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let json = EXPORT_JSON.replacen(
        r#""slug": "wiarton-willie","#,
        r#""slug": "wiarton-willie", "mascot": true,"#,
        1,
    );
    let config = config_for(dir.path(), &json, "early_spring", DatePolicy::Calendar);

    match groundhogs::convert(&config) {
        Err(ConvertError::SchemaMismatch { record, detail }) => {
            assert_eq!(record, 1);
            assert!(detail.contains("mascot"), "detail: {}", detail);
        }
        other => panic!("Expected SchemaMismatch, got {:?}", other),
    }
    assert!(!config.output.exists());
}

#[test]
fn test_missing_groundhogs_key_is_malformed() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path(), r#"{"critters": []}"#, "early_spring", DatePolicy::Calendar);

    assert!(matches!(groundhogs::convert(&config), Err(ConvertError::MalformedInput(_))));
}

#[test]
fn test_empty_predictions_is_malformed() {
    let dir = tempfile::tempdir().unwrap();
    let json = r#"{"groundhogs": [{"id": 1, "predictions": []}]}"#;
    let config = config_for(dir.path(), json, "early_spring", DatePolicy::Calendar);

    assert!(matches!(groundhogs::convert(&config), Err(ConvertError::MalformedInput(_))));
}
