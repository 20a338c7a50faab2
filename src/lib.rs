/// climdiv_tocsv: one-shot converters from semi-structured source data to CSV.
///
/// # Module structure
///
/// ```text
/// climdiv_tocsv
/// ├── model       — shared data types (ClimateRow, FlatPredictionRow, ConvertError, …)
/// ├── codes       — embedded NOAA state / element code registry (climdiv_codes.toml)
/// ├── config      — converter paths and output policies (tocsv.toml)
/// ├── logging     — tracing subscriber setup
/// ├── export      — CSV writing
/// └── ingest
///     ├── groundhogs — nested groundhog predictions JSON → one row per prediction
///     ├── climdiv    — NOAA climate-division fixed-width lines → one row per month
///     └── fixtures (test only) — representative input payloads
/// ```
///
/// Binaries:
///   cargo run --bin flatten_groundhogs
///   cargo run --bin parse_climdiv

/// Public modules
pub mod codes;
pub mod config;
pub mod export;
pub mod ingest;
pub mod logging;
pub mod model;
