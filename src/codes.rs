/// Climate-division code registry - parses climdiv_codes.toml
///
/// The state and measurement tables are compiled into the binary and are not
/// configurable at runtime. They are loaded once into a `CodeTables` value
/// which the parser receives as an argument, so tests can hand it a reduced
/// or altered table without touching any global state.

use serde::Deserialize;
use std::collections::HashMap;

use crate::model::{ConvertError, Measurement};

/// Embedded registry source.
const EMBEDDED_CODES: &str = include_str!("../climdiv_codes.toml");

// ---------------------------------------------------------------------------
// TOML structures
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CodeRegistry {
    state: Vec<StateEntry>,
    measurement: Vec<MeasurementEntry>,
}

/// A 2-digit state code and the full state name written to output.
#[derive(Debug, Clone, Deserialize)]
pub struct StateEntry {
    pub code: String,
    pub name: String,
}

/// A 2-digit element code and the column it populates.
#[derive(Debug, Clone, Deserialize)]
pub struct MeasurementEntry {
    pub code: String,
    pub column: Measurement,
}

// ---------------------------------------------------------------------------
// Lookup tables
// ---------------------------------------------------------------------------

/// Immutable code → name and code → column lookups.
#[derive(Debug, Clone)]
pub struct CodeTables {
    states: HashMap<String, String>,
    measurements: HashMap<String, Measurement>,
}

impl CodeTables {
    /// Builds tables from explicit entries. Later duplicates win.
    pub fn new(states: Vec<StateEntry>, measurements: Vec<MeasurementEntry>) -> Self {
        CodeTables {
            states: states.into_iter().map(|s| (s.code, s.name)).collect(),
            measurements: measurements.into_iter().map(|m| (m.code, m.column)).collect(),
        }
    }

    /// Parses a registry in the climdiv_codes.toml layout.
    pub fn from_toml(contents: &str) -> Result<Self, ConvertError> {
        let registry: CodeRegistry = toml::from_str(contents)
            .map_err(|e| ConvertError::Config(format!("invalid code registry: {}", e)))?;

        Ok(Self::new(registry.state, registry.measurement))
    }

    /// The registry compiled into the crate.
    pub fn embedded() -> Result<Self, ConvertError> {
        Self::from_toml(EMBEDDED_CODES)
    }

    /// Resolves a 2-digit state code to its full name.
    pub fn state_name(&self, code: &str) -> Result<&str, ConvertError> {
        self.states
            .get(code)
            .map(String::as_str)
            .ok_or_else(|| ConvertError::UnknownCode {
                table: "state",
                code: code.to_string(),
            })
    }

    /// Resolves a 2-digit element code to its measurement column.
    pub fn measurement(&self, code: &str) -> Result<Measurement, ConvertError> {
        self.measurements
            .get(code)
            .copied()
            .ok_or_else(|| ConvertError::UnknownCode {
                table: "measurement",
                code: code.to_string(),
            })
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn measurement_count(&self) -> usize {
        self.measurements.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_registry_loads() {
        let tables = CodeTables::embedded().unwrap();
        assert_eq!(tables.state_count(), 49, "Should have 49 state codes (01-48, 50)");
        assert_eq!(tables.measurement_count(), 3);
    }

    #[test]
    fn test_state_lookup() {
        let tables = CodeTables::embedded().unwrap();
        assert_eq!(tables.state_name("01").unwrap(), "Alabama");
        assert_eq!(tables.state_name("27").unwrap(), "New Hampshire");
        assert_eq!(tables.state_name("48").unwrap(), "Wyoming");
        assert_eq!(tables.state_name("50").unwrap(), "Alaska");
    }

    #[test]
    fn test_unknown_state_code() {
        let tables = CodeTables::embedded().unwrap();
        assert!(tables.state_name("49").is_err(), "49 has no state in the registry");
        match tables.state_name("99") {
            Err(ConvertError::UnknownCode { table, code }) => {
                assert_eq!(table, "state");
                assert_eq!(code, "99");
            }
            other => panic!("Expected UnknownCode, got {:?}", other),
        }
    }

    #[test]
    fn test_measurement_lookup() {
        let tables = CodeTables::embedded().unwrap();
        assert_eq!(tables.measurement("02").unwrap(), Measurement::AvgTemp);
        assert_eq!(tables.measurement("27").unwrap(), Measurement::MaxTemp);
        assert_eq!(tables.measurement("28").unwrap(), Measurement::MinTemp);
        assert!(matches!(
            tables.measurement("01"),
            Err(ConvertError::UnknownCode { table: "measurement", .. })
        ));
    }

    #[test]
    fn test_custom_registry() {
        let toml = r#"
[[state]]
code = "07"
name = "Delaware"

[[measurement]]
code = "02"
column = "avg_temp"
"#;
        let tables = CodeTables::from_toml(toml).unwrap();
        assert_eq!(tables.state_name("07").unwrap(), "Delaware");
        assert!(tables.state_name("01").is_err());
    }

    #[test]
    fn test_invalid_registry_is_config_error() {
        let result = CodeTables::from_toml("[[state]]\ncode = 1\n");
        assert!(matches!(result, Err(ConvertError::Config(_))));
    }
}
