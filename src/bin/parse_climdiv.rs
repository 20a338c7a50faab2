//! Climate Division Parser
//!
//! Converts a NOAA nClimDiv temperature file into a CSV with one row per
//! (line, month):
//! 1. Read the fixed-width file (default ./raw_data/noaa.txt)
//! 2. Decode each SSDDEEYYYY key against the embedded state / element tables
//! 3. Expand the 12 monthly values into dated rows
//! 4. Sort all rows by (date, state) and write the CSV (default ./gen/noa.csv)
//!
//! Usage:
//!   cargo run --bin parse_climdiv
//!
//! Environment:
//!   TOCSV_CONFIG - alternate config file (default tocsv.toml, optional)
//!   RUST_LOG     - log filter (default info)

use anyhow::{Context, Result};
use climdiv_tocsv::codes::CodeTables;
use climdiv_tocsv::config::load_config;
use climdiv_tocsv::ingest::climdiv;
use climdiv_tocsv::logging;

fn main() -> Result<()> {
    logging::init();

    let config = load_config().context("Failed to load converter config")?;
    let config = config.climdiv;

    let tables = CodeTables::embedded().context("Embedded code registry is invalid")?;
    tracing::debug!(
        "Loaded {} state codes, {} element codes",
        tables.state_count(),
        tables.measurement_count()
    );

    let rows = climdiv::convert(&config, &tables).with_context(|| {
        format!(
            "Failed to convert {} to {}",
            config.input.display(),
            config.output.display()
        )
    })?;
    tracing::info!("Wrote {} monthly rows", rows);

    println!("Generated {}", config.output.display());
    Ok(())
}
