//! Groundhog Prediction Flattener
//!
//! Converts the groundhog-day.com JSON export into a flat CSV with one row
//! per (groundhog, prediction year):
//! 1. Read the export (default ./raw_data/groundhogs.json)
//! 2. Derive columns from the first groundhog and check every record against them
//! 3. Replace each prediction's `year` with its February 2nd observation date
//! 4. Write the CSV (default ./gen/groundhogs.csv)
//!
//! Usage:
//!   cargo run --bin flatten_groundhogs
//!
//! Environment:
//!   TOCSV_CONFIG - alternate config file (default tocsv.toml, optional)
//!   RUST_LOG     - log filter (default info)

use anyhow::{Context, Result};
use climdiv_tocsv::config::load_config;
use climdiv_tocsv::ingest::groundhogs;
use climdiv_tocsv::logging;

fn main() -> Result<()> {
    logging::init();

    let config = load_config().context("Failed to load converter config")?;
    let config = config.groundhogs;

    let rows = groundhogs::convert(&config).with_context(|| {
        format!(
            "Failed to convert {} to {}",
            config.input.display(),
            config.output.display()
        )
    })?;
    tracing::info!("Flattened {} prediction rows", rows);

    println!("Generated {}", config.output.display());
    Ok(())
}
