//! Report layer for KEM timing logs
//!
//! Turns report definitions ([`ReportConfig`]) into LaTeX tables, looking
//! every cell up through [`timing_locator::RecordLocator`]. The binary in
//! `main.rs` is a thin CLI over this crate.

pub mod catalog;
pub mod config;
pub mod report;

pub use config::{load_config, BlockSpec, ReportConfig, TableSpec};
pub use report::{build_table, escape_label, render_latex, resolve_table, ResolvedTable};
