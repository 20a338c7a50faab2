/// Converter configuration loader - parses tocsv.toml
///
/// Both converters run with no flags. Their input/output paths and output
/// policies default to the layout the data directory has always used; an
/// optional `tocsv.toml` (or the file named by `TOCSV_CONFIG`, which may come
/// from a `.env` file) can override any of them.
///
/// ```toml
/// [groundhogs]
/// input = "./data/groundhogs.json"
/// output = "./data/groundhogs.csv"
/// date_field = "the_day"
/// date_policy = "literal"
///
/// [climdiv]
/// columns = "all_measurements"
/// ```

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::model::ConvertError;

/// Default config file, relative to the working directory.
pub const CONFIG_FILE: &str = "tocsv.toml";

/// Environment variable naming an alternate config file.
pub const CONFIG_ENV: &str = "TOCSV_CONFIG";

// ---------------------------------------------------------------------------
// Output policies
// ---------------------------------------------------------------------------

/// How the groundhog observation date is built from a prediction year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatePolicy {
    /// Through a real calendar date: `YYYY-02-02`, zero-padded.
    Calendar,
    /// Textual `{year}-02-02` with the year as written in the input.
    Literal,
}

/// Which measurement columns the climate CSV carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnSet {
    /// `date,state,max_temp,division,raw_code,raw_year`. Average and minimum
    /// values have no column and are left out of the file.
    Published,
    /// All three measurement columns; still one row per code.
    AllMeasurements,
}

// ---------------------------------------------------------------------------
// Config sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GroundhogConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Column that replaces the prediction's `year` field.
    pub date_field: String,
    pub date_policy: DatePolicy,
}

impl Default for GroundhogConfig {
    fn default() -> Self {
        GroundhogConfig {
            input: PathBuf::from("./raw_data/groundhogs.json"),
            output: PathBuf::from("./gen/groundhogs.csv"),
            date_field: "early_spring".to_string(),
            date_policy: DatePolicy::Calendar,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClimdivConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub columns: ColumnSet,
}

impl Default for ClimdivConfig {
    fn default() -> Self {
        ClimdivConfig {
            input: PathBuf::from("./raw_data/noaa.txt"),
            output: PathBuf::from("./gen/noa.csv"),
            columns: ColumnSet::Published,
        }
    }
}

/// Root configuration structure for TOML parsing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    pub groundhogs: GroundhogConfig,
    pub climdiv: ClimdivConfig,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Parses a config document. Missing tables and keys take their defaults.
pub fn parse_config(contents: &str) -> Result<ConverterConfig, ConvertError> {
    toml::from_str(contents).map_err(|e| ConvertError::Config(e.to_string()))
}

/// Loads config from `path`, or defaults when the file does not exist.
pub fn load_config_from(path: &Path) -> Result<ConverterConfig, ConvertError> {
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(ConverterConfig::default());
    }

    let contents = fs::read_to_string(path)?;
    let config = parse_config(&contents)
        .map_err(|e| ConvertError::Config(format!("{}: {}", path.display(), e)))?;
    tracing::info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Loads the active config: `.env` is read first, then `$TOCSV_CONFIG` or
/// `tocsv.toml` in the working directory.
pub fn load_config() -> Result<ConverterConfig, ConvertError> {
    dotenv::dotenv().ok();

    let path = env::var(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(CONFIG_FILE));

    load_config_from(&path)
}
