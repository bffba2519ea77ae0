//! Core types for the timing locator library
//!
//! The locator treats a timing log as an opaque stream of lines. These types
//! describe what is searched for (countermeasure mode, algorithm phase) and
//! what comes back (a table cell value). Nothing here is persisted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Result type for locator operations
pub type Result<T> = std::result::Result<T, LocatorError>;

/// Errors that can occur while locating a record
#[derive(Debug, thiserror::Error)]
pub enum LocatorError {
    #[error("Failed to read timing log {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid value pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

/// Timing side-channel countermeasure the measured build was compiled with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountermeasureMode {
    /// No countermeasure ("cacheless" column)
    None,
    /// Cache-attack countermeasure (`CM_CACHE`)
    Cache,
    /// Constant-time countermeasure (`CM_CT`)
    ConstantTime,
}

impl CountermeasureMode {
    /// All modes in column order
    pub const ALL: [CountermeasureMode; 3] = [
        CountermeasureMode::None,
        CountermeasureMode::Cache,
        CountermeasureMode::ConstantTime,
    ];

    /// Token searched for in block header lines
    pub fn token(&self) -> &'static str {
        match self {
            CountermeasureMode::None => "None",
            CountermeasureMode::Cache => "CM_CACHE",
            CountermeasureMode::ConstantTime => "CM_CT",
        }
    }

    /// Column label used in report headers
    pub fn label(&self) -> &'static str {
        match self {
            CountermeasureMode::None => "cacheless",
            CountermeasureMode::Cache => "cm_cache",
            CountermeasureMode::ConstantTime => "cm_ct",
        }
    }
}

impl fmt::Display for CountermeasureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Algorithm phase reported by the timing harness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    KeyGen,
    Encapsulate,
    Decapsulate,
    Total,
}

impl Phase {
    /// All phases in column-group order
    pub const ALL: [Phase; 4] = [
        Phase::KeyGen,
        Phase::Encapsulate,
        Phase::Decapsulate,
        Phase::Total,
    ];

    /// Token searched for in metric lines; doubles as the column group title
    pub fn token(&self) -> &'static str {
        match self {
            Phase::KeyGen => "KeyGen",
            Phase::Encapsulate => "Enc",
            Phase::Decapsulate => "Dec",
            Phase::Total => "Total",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Value of one table cell
///
/// Numbers are copied verbatim from the log; no unit conversion or
/// aggregation is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "cycles", rename_all = "snake_case")]
pub enum CellValue {
    /// Every integer found on the matched metric line, in order
    Cycles(Vec<u64>),
    /// The caller marked the combination as structurally invalid
    NotApplicable,
    /// No matching record in the log
    NoData,
}

impl CellValue {
    /// Collection-style rendering: `[12, 34]`, ` n/a ` or ` - `
    ///
    /// Every form carries one delimiter character on each side, which
    /// report builders strip before inserting the value into a cell.
    pub fn raw(&self) -> String {
        match self {
            CellValue::Cycles(values) => {
                let joined = values
                    .iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("[{}]", joined)
            }
            CellValue::NotApplicable => " n/a ".to_string(),
            CellValue::NoData => " - ".to_string(),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, CellValue::Cycles(_))
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw())
    }
}
