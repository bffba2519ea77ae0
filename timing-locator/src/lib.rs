//! Timing Log Locator Library
//!
//! A small, stateless library for pulling CPU-cycle counts out of the
//! plaintext logs written by a KEM speed-test harness.
//!
//! # Architecture
//!
//! The log is never parsed into structured records. A lookup scans the file
//! line by line for a "header" line containing every search criterion
//! (parameter set, countermeasure mode, instruction-set flag, AES flag and
//! `TAU=<n>`), then looks a bounded number of lines further for the metric
//! line of the requested algorithm phase.
//!
//! The library does NOT:
//! - Render tables or escape markup
//! - Decide which parameter sets or flag combinations to report
//! - Convert units or validate numbers
//!
//! Report generation lives in the application layer (timing-table).
//!
//! # Example Usage
//!
//! ```no_run
//! use timing_locator::{CellValue, CountermeasureMode, LocatorConfig, Phase, Query, RecordLocator};
//!
//! let locator = RecordLocator::new("timing_results.txt", LocatorConfig::new()).unwrap();
//!
//! let query = Query::new("R5N1_1CPA_0d", CountermeasureMode::ConstantTime, Phase::KeyGen)
//!     .with_instruction_set("AVX");
//!
//! match locator.find(&query).unwrap() {
//!     CellValue::Cycles(values) => println!("cycles: {:?}", values),
//!     CellValue::NotApplicable => println!("not applicable"),
//!     CellValue::NoData => println!("no record"),
//! }
//! ```

// Public modules
pub mod config;
pub mod locator;
pub mod query;
pub mod types;

// Re-export main types for convenience
pub use config::{LocatorConfig, MatchMode};
pub use locator::RecordLocator;
pub use query::{Query, Tau, ABSENT_FLAG};
pub use types::{CellValue, CountermeasureMode, LocatorError, Phase, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
